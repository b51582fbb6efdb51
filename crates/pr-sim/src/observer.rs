//! Simulation observer trait for progress reporting and data collection.

use pr_core::SimTime;
use pr_decision::DecisionOutcome;
use pr_fleet::VehicleRegistry;

use crate::{Counters, Event};

/// Totals of a finished run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub end_time: SimTime,
    pub events_executed: u64,
    pub vehicles_seen: usize,
    pub parked: usize,
    pub relays: usize,
    pub counters: Counters,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called before each event executes.
    fn on_event(&mut self, _time: SimTime, _event: &Event) {}

    /// Called for every finished (non-stale, non-failed) decision.
    fn on_decision(&mut self, _outcome: &DecisionOutcome) {}

    /// Called after each periodic statistics collection.
    fn on_collect(&mut self, _time: SimTime, _registry: &VehicleRegistry) {}

    /// Called once after final statistics are written.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
