//! Error types for calview.

use thiserror::Error;

use crate::draft::FieldError;

/// Errors that can occur in calview operations.
#[derive(Error, Debug)]
pub enum CalviewError {
    #[error("Invalid {field} timestamp: '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("End time must be after start time")]
    InvalidTimeRange,

    #[error("Title is required")]
    EmptyTitle,

    #[error("Recurrence interval must be at least 1 (got {0})")]
    InvalidInterval(i64),

    #[error("Day of week must be between 0 (Sunday) and 6 (Saturday) (got {0})")]
    InvalidWeekday(i64),

    #[error("An event with id '{0}' already exists")]
    DuplicateEventId(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid event: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for calview operations.
pub type CalviewResult<T> = Result<T, CalviewError>;
