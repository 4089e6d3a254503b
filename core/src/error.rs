//! Errors raised by the attendance and schedule calculators.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed time '{0}', expected HH:MM")]
    MalformedTime(String),

    #[error("Time slot {day} {start_time}-{end_time} conflicts with an existing class")]
    Conflict {
        day: String,
        start_time: String,
        end_time: String,
    },

    #[error("Invalid weekday: '{0}'")]
    InvalidDay(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
