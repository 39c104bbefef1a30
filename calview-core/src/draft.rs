//! Create/edit event form.
//!
//! An `EventDraft` holds raw, possibly invalid field values. `validate` reports
//! every problem at once, labeled by field; `into_new_event` and `apply_to`
//! turn a valid draft into an `Event`.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use url::Url;

use crate::error::{CalviewError, CalviewResult};
use crate::event::{ClientInfo, Event, EventType};
use crate::recurrence::{Frequency, RecurrenceRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    EndTime,
    ClientProfileUrl,
    RecurrenceInterval,
    RecurrenceDaysOfWeek,
    RecurrenceEndDate,
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: DraftField,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub kind: EventType,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: String,
    pub client_name: String,
    pub client_profile_url: String,
    /// Carried over from an edited event; not editable in the form
    pub client_avatar: Option<String>,
    pub recurrence: RecurrenceDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceDraft {
    pub frequency: Frequency,
    pub interval: i64,
    pub end_date: Option<NaiveDate>,
    /// 0=Sunday..6=Saturday
    pub days_of_week: Vec<i64>,
}

impl Default for RecurrenceDraft {
    fn default() -> Self {
        RecurrenceDraft {
            frequency: Frequency::None,
            interval: 1,
            end_date: None,
            days_of_week: Vec::new(),
        }
    }
}

impl EventDraft {
    /// Blank draft for a new appointment starting on `date` at `time`.
    pub fn for_date(date: NaiveDate, time: NaiveTime, duration: Duration) -> Self {
        let start_time = date.and_time(time);
        EventDraft {
            title: String::new(),
            kind: EventType::Appointment,
            start_time,
            end_time: start_time + duration,
            description: String::new(),
            client_name: String::new(),
            client_profile_url: String::new(),
            client_avatar: None,
            recurrence: RecurrenceDraft::default(),
        }
    }

    /// Draft prefilled from an existing event, for editing.
    pub fn from_event(event: &Event) -> Self {
        let client = event.client_info.as_ref();
        let recurrence = event
            .recurrence
            .as_ref()
            .map(|rule| RecurrenceDraft {
                frequency: rule.frequency,
                interval: i64::from(rule.interval.get()),
                end_date: rule.end_date,
                days_of_week: rule
                    .days_of_week
                    .iter()
                    .map(|d| i64::from(d.num_days_from_sunday()))
                    .collect(),
            })
            .unwrap_or_default();

        EventDraft {
            title: event.title.clone(),
            kind: event.kind,
            start_time: event.start_time,
            end_time: event.end_time,
            description: event.description.clone().unwrap_or_default(),
            client_name: client.map(|c| c.name.clone()).unwrap_or_default(),
            client_profile_url: client
                .and_then(|c| c.profile_url.clone())
                .unwrap_or_default(),
            client_avatar: client.and_then(|c| c.avatar.clone()),
            recurrence,
        }
    }

    /// Every validation failure in the draft.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::new(DraftField::Title, "Title is required"));
        }

        if self.end_time <= self.start_time {
            errors.push(FieldError::new(
                DraftField::EndTime,
                "End time must be after start time",
            ));
        }

        let url = self.client_profile_url.trim();
        if self.kind == EventType::Appointment && !url.is_empty() && Url::parse(url).is_err() {
            errors.push(FieldError::new(DraftField::ClientProfileUrl, "Invalid URL"));
        }

        let recurrence = &self.recurrence;
        if recurrence.frequency != Frequency::None {
            if recurrence.interval < 1 {
                errors.push(FieldError::new(
                    DraftField::RecurrenceInterval,
                    "Repeat interval must be at least 1",
                ));
            }
            if recurrence.frequency == Frequency::Weekly
                && recurrence.days_of_week.iter().any(|d| !(0..=6).contains(d))
            {
                errors.push(FieldError::new(
                    DraftField::RecurrenceDaysOfWeek,
                    "Days of week must be between 0 (Sunday) and 6 (Saturday)",
                ));
            }
            if recurrence
                .end_date
                .is_some_and(|end| end < self.start_time.date())
            {
                errors.push(FieldError::new(
                    DraftField::RecurrenceEndDate,
                    "End date must not be before the start date",
                ));
            }
        }

        errors
    }

    pub fn validate(&self) -> CalviewResult<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CalviewError::Validation(errors))
        }
    }

    /// Build a new event with a freshly generated id.
    pub fn into_new_event(self) -> CalviewResult<Event> {
        self.build(uuid::Uuid::new_v4().to_string())
    }

    /// Build the replacement for `existing`, keeping its id.
    pub fn apply_to(self, existing: &Event) -> CalviewResult<Event> {
        self.build(existing.id.clone())
    }

    fn build(self, id: String) -> CalviewResult<Event> {
        self.validate()?;

        let recurrence = match self.recurrence.frequency {
            Frequency::None => None,
            frequency => {
                let days: &[i64] = if frequency == Frequency::Weekly {
                    self.recurrence.days_of_week.as_slice()
                } else {
                    &[]
                };
                Some(RecurrenceRule::from_parts(
                    frequency,
                    self.recurrence.interval,
                    self.recurrence.end_date,
                    days,
                )?)
            }
        };

        let client_name = self.client_name.trim();
        let client_info = (self.kind == EventType::Appointment && !client_name.is_empty()).then(|| {
            let url = self.client_profile_url.trim();
            ClientInfo {
                name: client_name.to_string(),
                avatar: self.client_avatar.clone(),
                profile_url: (!url.is_empty()).then(|| url.to_string()),
            }
        });

        let mut event = Event::with_id(id, self.title.trim(), self.start_time, self.end_time, self.kind)?;
        event.client_info = client_info;
        event.description = Some(self.description).filter(|d| !d.trim().is_empty());
        event.recurrence = recurrence;

        Ok(event)
    }
}

impl FieldError {
    fn new(field: DraftField, message: &str) -> Self {
        FieldError {
            field,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftField::Title => "title",
            DraftField::EndTime => "endTime",
            DraftField::ClientProfileUrl => "clientInfo.profileUrl",
            DraftField::RecurrenceInterval => "recurrence.interval",
            DraftField::RecurrenceDaysOfWeek => "recurrence.daysOfWeek",
            DraftField::RecurrenceEndDate => "recurrence.endDate",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
