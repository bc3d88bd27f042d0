//! Error types for classcal.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Errors that abort a whole operation (as opposed to a single row).
#[derive(Error, Debug)]
pub enum ClassCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not obtain an authenticated calendar handle: {0}")]
    Authentication(#[source] GatewayError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Recurrence error: {0}")]
    Recurrence(String),

    #[error("Refusing to purge with an empty prefix (it would match every event)")]
    EmptyPrefix,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A row that could not be turned into a calendar event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("subject is empty")]
    EmptySubject,

    #[error("invalid {field} '{value}', expected dd/mm/yyyy")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid {field} '{value}', expected HH:MM")]
    InvalidTime { field: &'static str, value: String },

    #[error("invalid weekday '{0}', expected a number from 2 (Monday) to 7 (Saturday)")]
    InvalidWeekday(String),

    #[error("start time {start} is not before end time {end}")]
    EmptyTimeSlot { start: NaiveTime, end: NaiveTime },

    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}

/// Failures reported by (or while talking to) the calendar service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    Timeout(u64),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Transport(format!("Malformed provider message: {err}"))
    }
}

/// Result type alias for classcal operations.
pub type ClassCalResult<T> = Result<T, ClassCalError>;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
