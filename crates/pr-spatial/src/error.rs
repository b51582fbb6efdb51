//! Spatial-subsystem error type.

use thiserror::Error;

use pr_core::PointId;

#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("point {0} not found in index")]
    PointNotFound(PointId),

    #[error("unknown feature code {0}")]
    UnknownFeature(u32),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
