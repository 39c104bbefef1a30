//! Loading events from JSON.
//!
//! This is the boundary where untrusted timestamps and recurrence settings are
//! checked. Records that fail are skipped and reported; the rest still load.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{CalviewError, CalviewResult};
use crate::event::{ClientInfo, Event, EventType};
use crate::recurrence::{Frequency, RecurrenceRule};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// An event as it appears in an events file, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRecord {
    #[serde(rename = "type")]
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: i64,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub days_of_week: Option<Vec<i64>>,
}

fn default_interval() -> i64 {
    1
}

/// A record that could not be turned into an event
#[derive(Debug)]
pub struct Rejected {
    /// Position of the record in the source array
    pub index: usize,
    pub id: Option<String>,
    pub error: CalviewError,
}

/// Result of loading a batch of records
#[derive(Debug, Default)]
pub struct Ingested {
    pub events: Vec<Event>,
    pub rejected: Vec<Rejected>,
}

impl EventRecord {
    /// Validate the record, converting offset-aware timestamps into `offset` local time.
    ///
    /// Records without an id are given a fresh one.
    pub fn into_event(self, offset: FixedOffset) -> CalviewResult<Event> {
        let start_time = parse_timestamp("startTime", &self.start_time, offset)?;
        let end_time = parse_timestamp("endTime", &self.end_time, offset)?;

        let mut event = match self.id {
            Some(id) => Event::with_id(id, self.title, start_time, end_time, self.kind)?,
            None => Event::new(self.title, start_time, end_time, self.kind)?,
        };

        // Client details only belong on appointments with a named client.
        let kind = self.kind;
        event.client_info = self
            .client_info
            .filter(|c| kind == EventType::Appointment && !c.name.trim().is_empty());
        event.description = self.description.filter(|d| !d.is_empty());
        event.recurrence = self
            .recurrence
            .map(|r| r.into_rule(offset))
            .transpose()?;

        Ok(event)
    }
}

impl RecurrenceRecord {
    pub fn into_rule(self, offset: FixedOffset) -> CalviewResult<RecurrenceRule> {
        let end_date = self
            .end_date
            .as_deref()
            .map(|s| parse_date("recurrence.endDate", s, offset))
            .transpose()?;
        let days = self.days_of_week.unwrap_or_default();

        RecurrenceRule::from_parts(self.frequency, self.interval, end_date, &days)
    }
}

/// Parse a JSON array of event records.
///
/// Fails only when the input is not a JSON array. Individual bad records are
/// logged, skipped and returned in `Ingested::rejected`, as are records whose
/// id repeats an earlier one.
pub fn load_events(json: &str, offset: FixedOffset) -> CalviewResult<Ingested> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| CalviewError::Serialization(format!("Events must be a JSON array: {e}")))?;

    let mut ingested = Ingested::default();
    let mut seen = HashSet::new();

    for (index, value) in values.into_iter().enumerate() {
        let id = value.get("id").and_then(|v| v.as_str()).map(String::from);

        let result = serde_json::from_value::<EventRecord>(value)
            .map_err(|e| CalviewError::Serialization(e.to_string()))
            .and_then(|record| record.into_event(offset))
            .and_then(|event| {
                if seen.insert(event.id.clone()) {
                    Ok(event)
                } else {
                    Err(CalviewError::DuplicateEventId(event.id))
                }
            });

        match result {
            Ok(event) => ingested.events.push(event),
            Err(error) => {
                tracing::warn!(index, id = ?id, %error, "skipping event record");
                ingested.rejected.push(Rejected { index, id, error });
            }
        }
    }

    tracing::debug!(
        loaded = ingested.events.len(),
        rejected = ingested.rejected.len(),
        "loaded events"
    );

    Ok(ingested)
}

/// Read and parse an events file.
pub fn load_events_file(path: &Path, offset: FixedOffset) -> CalviewResult<Ingested> {
    let content = std::fs::read_to_string(path)?;
    load_events(&content, offset)
}

/// Parse a timestamp field.
///
/// Accepts RFC 3339 with an offset (converted to `offset`) or a naive
/// `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD HH:MM[:SS]` already in local time.
pub fn parse_timestamp(field: &'static str, value: &str, offset: FixedOffset) -> CalviewResult<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&offset).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| CalviewError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Parse a date field, accepting a bare `YYYY-MM-DD` or any timestamp `parse_timestamp` accepts.
pub fn parse_date(field: &'static str, value: &str, offset: FixedOffset) -> CalviewResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        return Ok(date);
    }

    parse_timestamp(field, value, offset)
        .map(|dt| dt.date())
        .map_err(|_| CalviewError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}
