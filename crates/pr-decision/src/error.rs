use thiserror::Error;

use pr_core::VehicleId;
use pr_grid::GridError;
use pr_network::NetworkError;

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("invalid request reach {0:?} (expected oneHop, twoHop or geocastRadius)")]
    InvalidReach(String),

    #[error("decision configuration error: {0}")]
    Config(String),

    #[error("vehicle {vehicle}: undecodable coverage reply #{index}: {source}")]
    Decode {
        vehicle: VehicleId,
        index: usize,
        #[source]
        source: NetworkError,
    },

    #[error("vehicle {0} has no self-coverage map")]
    MissingSelfCoverage(VehicleId),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type DecisionResult<T> = Result<T, DecisionError>;
