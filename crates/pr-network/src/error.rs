//! Network error type.

use thiserror::Error;

use pr_grid::GridError;

use crate::PayloadKind;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("expected a {expected} payload, found {found}")]
    WrongKind { expected: PayloadKind, found: PayloadKind },

    #[error("malformed {kind} payload: {reason}")]
    Decode { kind: PayloadKind, reason: String },

    #[error("cannot encode an empty {0} payload")]
    EmptyPayload(PayloadKind),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("invalid network configuration: {0}")]
    Config(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
