//! Calendar event types.
//!
//! An `Event` is anchored on its `start_time`; recurring events carry a
//! `RecurrenceRule` that generates further occurrences from that anchor.
//! Timestamps are naive local times in the configured display offset.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalviewError, CalviewResult};
use crate::recurrence::{self, RecurrenceRule};

/// A calendar event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(serialize_with = "timestamp::serialize")]
    pub start_time: NaiveDateTime,
    #[serde(serialize_with = "timestamp::serialize")]
    pub end_time: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

/// Client details shown on appointment-like events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Appointment,
    Webinar,
}

impl Event {
    /// Create an event with a freshly generated id.
    pub fn new(
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        kind: EventType,
    ) -> CalviewResult<Self> {
        Self::with_id(uuid::Uuid::new_v4().to_string(), title, start_time, end_time, kind)
    }

    /// Create an event with a caller-supplied id.
    ///
    /// Rejects blank titles and time ranges where the end is not after the start.
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        kind: EventType,
    ) -> CalviewResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CalviewError::EmptyTitle);
        }
        if end_time <= start_time {
            return Err(CalviewError::InvalidTimeRange);
        }

        Ok(Event {
            id: id.into(),
            title,
            start_time,
            end_time,
            kind,
            client_info: None,
            description: None,
            recurrence: None,
        })
    }

    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = Some(client_info);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// The anchor date all occurrences are computed from.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Whether this event has a rule that can produce more than one occurrence.
    pub fn is_recurring(&self) -> bool {
        self.recurrence.as_ref().is_some_and(RecurrenceRule::repeats)
    }

    /// Whether the event occurs on the given calendar day.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        recurrence::occurs_on(self, date)
    }

    /// Every date in `[from, to]` on which the event occurs.
    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let anchor = self.start_date();
        match &self.recurrence {
            Some(rule) => rule.occurrences_between(anchor, from, to),
            None if from <= anchor && anchor <= to => vec![anchor],
            None => Vec::new(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Appointment => write!(f, "Appointment"),
            EventType::Webinar => write!(f, "Webinar"),
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "appointment" => Ok(EventType::Appointment),
            "webinar" => Ok(EventType::Webinar),
            other => Err(format!(
                "Unknown event type '{}'. Expected appointment or webinar",
                other
            )),
        }
    }
}

/// Serde format for naive event timestamps (`2024-03-01T10:00:00`).
pub(crate) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }
}
