//! What the engine asks the simulation to do.

use pr_core::{SimTime, VehicleId};
use pr_fleet::Role;
use pr_network::{Destination, Payload};

use crate::{CoverageScore, DecisionRecord, DecisionState, Ticket};

/// Effects of a [`trigger`](crate::DecisionEngine::trigger), applied in order
/// by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Transmit `payload` from the vehicle to `destination`.  The network
    /// assigns the packet id.
    Send { payload: Payload, destination: Destination },

    /// Queue a `Decide` event carrying `ticket` at `at`.
    ScheduleDecide { at: SimTime, ticket: Ticket },
}

/// A role change the simulation must apply to its registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoleTransition {
    pub vehicle: VehicleId,
    pub at: SimTime,
    pub to: Role,
}

/// Result of a finished decision cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionOutcome {
    pub vehicle: VehicleId,
    /// `ConvertedToRelay` or `RemainedParked`.
    pub state: DecisionState,
    /// `None` when no coverage reply arrived.
    pub score: Option<CoverageScore>,
    pub transition: Option<RoleTransition>,
    pub record: Option<DecisionRecord>,
}
