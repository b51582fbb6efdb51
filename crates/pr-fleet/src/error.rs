//! Fleet error type.

use thiserror::Error;

use pr_core::VehicleId;
use pr_grid::GridError;
use pr_spatial::SpatialError;

use crate::Role;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("vehicle {0} not found")]
    NotFound(VehicleId),

    #[error("vehicle {0} already exists")]
    Duplicate(VehicleId),

    #[error("vehicle {id} is {found}, expected {expected}")]
    WrongRole { id: VehicleId, expected: Role, found: Role },

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type FleetResult<T> = Result<T, FleetError>;
