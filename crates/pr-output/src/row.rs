//! Plain data row types written by output backends.

use pr_core::SimTime;
use pr_decision::{DecisionOutcome, DecisionState};
use pr_fleet::{Role, VehicleRegistry};

/// One scored decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionRow {
    pub time_secs: f64,
    pub vehicle:   u32,
    pub d_new:     u64,
    pub d_boost:   u64,
    pub d_sat:     u64,
    pub d_score:   f64,
    pub kappa:     f64,
    pub lambda:    f64,
    pub mu:        f64,
    pub converted: bool,
}

impl DecisionRow {
    /// `None` for outcomes that were never scored (no replies).
    pub fn from_outcome(outcome: &DecisionOutcome) -> Option<Self> {
        let record = outcome.record.as_ref()?;
        Some(Self {
            time_secs: record.time.as_secs_f64(),
            vehicle:   record.vehicle.0,
            d_new:     record.score.d_new,
            d_boost:   record.score.d_boost,
            d_sat:     record.score.d_sat,
            d_score:   record.score.d_score,
            kappa:     record.kappa,
            lambda:    record.lambda,
            mu:        record.mu,
            converted: outcome.state == DecisionState::ConvertedToRelay,
        })
    }
}

/// Role counts at one statistics collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionRow {
    pub time_secs:       f64,
    pub active_vehicles: u64,
    pub parked:          u64,
    pub relays:          u64,
}

impl CollectionRow {
    pub fn collect(time: SimTime, registry: &VehicleRegistry) -> Self {
        Self {
            time_secs:       time.as_secs_f64(),
            active_vehicles: registry.active_moving_count() as u64,
            parked:          registry.count_role(Role::Parked) as u64,
            relays:          registry.count_role(Role::RoadsideUnit) as u64,
        }
    }
}
