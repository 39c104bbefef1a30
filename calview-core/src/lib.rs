//! Core types for calview.
//!
//! - `event` and `recurrence`: the event model and the occurrence matcher
//! - `ingest`: loading and validating events from JSON
//! - `state`: the event list and selection, with its transitions
//! - `draft`: the create/edit form and its validation
//! - `month`: the month grid, year summaries and day agenda
//! - `config`: user configuration

pub mod config;
pub mod draft;
pub mod error;
pub mod event;
pub mod ingest;
pub mod month;
pub mod recurrence;
pub mod seed;
pub mod state;

pub use error::{CalviewError, CalviewResult};
pub use event::{ClientInfo, Event, EventType};
pub use recurrence::{Frequency, RecurrenceRule, occurs_on};
pub use state::CalendarState;
