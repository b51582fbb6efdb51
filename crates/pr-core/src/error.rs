//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `PrError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::VehicleId;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("unknown hook name {0:?}")]
    UnknownHook(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `pr-core`.
pub type PrResult<T> = Result<T, PrError>;
