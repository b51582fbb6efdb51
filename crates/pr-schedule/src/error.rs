//! Schedule-subsystem error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("mobility parse error: {0}")]
    Parse(String),

    #[error("invalid parking lifetime model: {0}")]
    Lifetime(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
