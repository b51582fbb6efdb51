use thiserror::Error;

use pr_core::PrError;
use pr_decision::DecisionError;
use pr_fleet::FleetError;
use pr_grid::GridError;
use pr_network::NetworkError;
use pr_schedule::ScheduleError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("failed to parse scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] PrError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type SimResult<T> = Result<T, SimError>;
