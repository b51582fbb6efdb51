//! Fluent builder for constructing a [`Sim`].

use log::info;

use pr_core::{HookSink, NoopSink, SimTime};
use pr_decision::DecisionEngine;
use pr_network::{SignalModel, SteppedSignalModel};
use pr_schedule::{EventQueue, MobilityBatch};

use crate::sim::SimState;
use crate::stats;
use crate::{Event, ScenarioConfig, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<K>`].
///
/// # Required inputs
///
/// - [`ScenarioConfig`]
/// - the mobility feed as time-ordered [`MobilityBatch`]es
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                          |
/// |---------------------|----------------------------------|
/// | `.sink(s)`          | `NoopSink` (every hook disabled) |
/// | `.signal_model(m)`  | `SteppedSignalModel::porto()`    |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, batches)
///     .sink(FileHookSink::create(&folder, hooks)?)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<K: HookSink = NoopSink> {
    config: ScenarioConfig,
    batches: Vec<MobilityBatch>,
    sink: K,
    signal: Option<Box<dyn SignalModel>>,
}

impl SimBuilder<NoopSink> {
    pub fn new(config: ScenarioConfig, batches: Vec<MobilityBatch>) -> Self {
        Self { config, batches, sink: NoopSink, signal: None }
    }
}

impl<K: HookSink> SimBuilder<K> {
    /// Replace the hook sink.
    pub fn sink<S: HookSink>(self, sink: S) -> SimBuilder<S> {
        SimBuilder { config: self.config, batches: self.batches, sink, signal: self.signal }
    }

    pub fn signal_model(mut self, model: impl SignalModel + 'static) -> Self {
        self.signal = Some(Box::new(model));
        self
    }

    /// Validate inputs, derive city geometry, queue the mobility and
    /// statistics events, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<K>> {
        self.config.validate()?;
        if let Some(w) = self.batches.windows(2).find(|w| w[1].time < w[0].time) {
            return Err(SimError::Config(format!(
                "mobility batches out of order: t={} after t={}",
                w[1].time, w[0].time
            )));
        }

        // ── City geometry ─────────────────────────────────────────────────
        let city = stats::city_rect(&self.batches)?;
        let mask = match city {
            Some(rect) if self.config.stats.build_obstruction_mask => {
                Some(stats::obstruction_mask(rect, &self.batches))
            }
            _ => None,
        };
        if let Some(rect) = city {
            info!("city covers {rect} ({} cells)", rect.cell_count());
        }

        // ── Event queue ───────────────────────────────────────────────────
        let mut queue = EventQueue::new(self.config.sim.stop_time());
        for (i, batch) in self.batches.iter().enumerate() {
            Event::MobilityUpdate(i).schedule_at(&mut queue, batch.time);
        }
        for t in self.config.sim.collection_times() {
            Event::CollectStats.schedule_at(&mut queue, t);
        }

        let engine = DecisionEngine::new(self.config.decision.clone(), self.sink)?;
        let signal = self.signal.unwrap_or_else(|| Box::new(SteppedSignalModel::porto()));
        info!("{} mobility batches, {} events queued", self.batches.len(), queue.len());

        let size = self.config.network.self_coverage_map_size;
        let fixed = self.config.roadside_units.clone();
        let mut state = SimState::new(self.config, self.batches, engine, signal, city, mask);
        for rsu in &fixed {
            state.registry.add_roadside_unit(rsu.vehicle_id(), rsu.position(), SimTime::ZERO, size)?;
        }
        if !fixed.is_empty() {
            info!("{} fixed roadside units placed", fixed.len());
        }
        Ok(Sim::new(queue, state))
    }
}
