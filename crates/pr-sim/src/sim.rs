//! The `Sim` struct and its event dispatcher.

use std::collections::BTreeMap;

use log::{debug, error, info, trace, warn};

use pr_core::{HookSink, NoopSink, SimRng, SimTime, VehicleId, VehicleRng};
use pr_decision::{
    Command, DecideContext, DecisionEngine, DecisionOutcome, DecisionRecord, Ticket, TriggerContext,
};
use pr_fleet::{Role, VehicleRegistry};
use pr_grid::{CellMap, CellRect, Obstruction};
use pr_network::{Beacon, Destination, PacketIdGenerator, PayloadContent, SignalModel};
use pr_schedule::{EventHandler, EventQueue, MobilityBatch, ScheduledEvent};
use pr_spatial::FeatureType;

use crate::observer::RunSummary;
use crate::stats::{self, Counters};
use crate::{Event, ScenarioConfig, SimError, SimObserver, SimResult};

// ── SimState ──────────────────────────────────────────────────────────────────

/// Everything events act on.  Kept apart from the queue so the dispatcher
/// can borrow both mutably.
pub struct SimState<K: HookSink> {
    pub config: ScenarioConfig,
    pub batches: Vec<MobilityBatch>,
    pub registry: VehicleRegistry,
    pub engine: DecisionEngine<K>,
    pub signal: Box<dyn SignalModel>,
    pub packet_ids: PacketIdGenerator,
    pub city: Option<CellRect>,
    pub mask: Option<CellMap<Obstruction>>,
    pub counters: Counters,
    /// Scored decisions, in decision order.
    pub decisions: Vec<DecisionRecord>,
    rng: SimRng,
    vehicle_rngs: BTreeMap<VehicleId, VehicleRng>,
    /// Outcomes not yet reported to the observer.
    pending_outcomes: Vec<DecisionOutcome>,
    /// First unrecoverable error raised inside an event.
    error: Option<SimError>,
}

impl<K: HookSink> SimState<K> {
    pub(crate) fn new(
        config: ScenarioConfig,
        batches: Vec<MobilityBatch>,
        engine: DecisionEngine<K>,
        signal: Box<dyn SignalModel>,
        city: Option<CellRect>,
        mask: Option<CellMap<Obstruction>>,
    ) -> Self {
        let rng = SimRng::new(config.sim.seed);
        Self {
            config,
            batches,
            registry: VehicleRegistry::new(),
            engine,
            signal,
            packet_ids: PacketIdGenerator::new(),
            city,
            mask,
            counters: Counters::default(),
            decisions: Vec::new(),
            rng,
            vehicle_rngs: BTreeMap::new(),
            pending_outcomes: Vec::new(),
            error: None,
        }
    }

    fn vehicle_rng(&mut self, vehicle: VehicleId) -> &mut VehicleRng {
        let rng = &self.rng;
        self.vehicle_rngs.entry(vehicle).or_insert_with(|| rng.for_vehicle(vehicle))
    }

    fn dispatch(&mut self, event: Event, queue: &mut EventQueue<Event>) -> SimResult<()> {
        match event {
            Event::MobilityUpdate(index) => self.on_mobility(index, queue),
            Event::Beacon { vehicle, trip } => self.on_beacon(vehicle, trip, queue),
            Event::Trigger { vehicle, ticket } => self.on_trigger(vehicle, ticket, queue),
            Event::Decide { vehicle, ticket } => self.on_decide(vehicle, ticket, queue.now()),
            Event::Deliver { packet, to } => self.deliver(packet, to, queue),
            Event::DeferredReply { relay, requester } => self.on_deferred_reply(relay, requester, queue),
            Event::ParkingExpired { vehicle, parked_at } => self.on_parking_expired(vehicle, parked_at),
            Event::CollectStats => stats::write_periodic(
                self.engine.sink_mut(),
                queue.now(),
                &self.registry,
                &self.counters,
                self.city,
                self.mask.as_ref(),
            ),
        }
    }

    pub(crate) fn stale(&mut self, what: &str, vehicle: VehicleId) {
        self.counters.stale_events += 1;
        trace!("stale {what} for vehicle {vehicle}");
    }

    // ── Mobility and lifecycle ────────────────────────────────────────────

    fn on_mobility(&mut self, index: usize, queue: &mut EventQueue<Event>) -> SimResult<()> {
        let Some(batch) = self.batches.get(index) else {
            return Err(SimError::Config(format!("mobility batch {index} does not exist")));
        };
        let outcome = self.registry.apply_batch(batch)?;
        let now = queue.now();
        let beacon_at = now + self.config.network.beacon_interval();

        for &vehicle in &outcome.reactivated {
            self.engine.disarm(vehicle);
        }
        for &vehicle in outcome.created.iter().chain(&outcome.reactivated) {
            Event::Beacon { vehicle, trip: now }.schedule_at(queue, beacon_at);
        }
        for &vehicle in &outcome.left {
            self.end_trip(vehicle, now, queue)?;
        }
        Ok(())
    }

    fn end_trip(&mut self, vehicle: VehicleId, now: SimTime, queue: &mut EventQueue<Event>) -> SimResult<()> {
        if !self.config.parking.enabled {
            self.registry.depart(vehicle)?;
            return Ok(());
        }
        let size = self.config.network.self_coverage_map_size;
        self.registry.park(vehicle, now, size)?;

        let lifetime = self.config.parking.lifetime.clone();
        let stay = lifetime.sample(self.vehicle_rng(vehicle))?;
        Event::ParkingExpired { vehicle, parked_at: now }.schedule_at(queue, now + stay);

        let ticket = self.engine.arm(vehicle);
        let at = now + self.config.decision.trigger_delay();
        Event::Trigger { vehicle, ticket }.schedule_at(queue, at);
        debug!("vehicle {vehicle} parked for {stay}s, decision at t={at}");
        Ok(())
    }

    fn on_parking_expired(&mut self, vehicle: VehicleId, parked_at: SimTime) -> SimResult<()> {
        let rec = self.registry.get(vehicle)?;
        if rec.parked_at != Some(parked_at) || !rec.role.is_fixed() {
            self.stale("parking expiry", vehicle);
            return Ok(());
        }
        self.registry.depart(vehicle)?;
        self.engine.disarm(vehicle);
        Ok(())
    }

    // ── Beaconing ─────────────────────────────────────────────────────────

    fn on_beacon(&mut self, vehicle: VehicleId, trip: SimTime, queue: &mut EventQueue<Event>) -> SimResult<()> {
        let rec = self.registry.get(vehicle)?;
        if rec.role != Role::Moving || !rec.active || rec.trip_started != trip {
            return Ok(());
        }
        let payload = Beacon { position: rec.position, source: vehicle, kind: FeatureType::Vehicle }
            .to_payload()?;
        self.originate(vehicle, Destination::Broadcast { hop_limit: 1 }, payload, queue)?;
        self.counters.beacons_sent += 1;
        Event::Beacon { vehicle, trip }.schedule_in(queue, self.config.network.beacon_interval());
        Ok(())
    }

    // ── Decisions ─────────────────────────────────────────────────────────

    fn on_trigger(&mut self, vehicle: VehicleId, ticket: Ticket, queue: &mut EventQueue<Event>) -> SimResult<()> {
        let rec = self.registry.get(vehicle)?;
        if rec.role != Role::Parked {
            self.stale("trigger", vehicle);
            return Ok(());
        }
        let ctx = TriggerContext {
            now: queue.now(),
            position: rec.position,
            max_range_m: self.config.network.max_range_m,
        };
        let Some(commands) = self.engine.trigger(vehicle, ticket, &ctx)? else {
            self.stale("trigger", vehicle);
            return Ok(());
        };
        self.registry.get_mut(vehicle)?.payload_buffer.clear();
        for command in commands {
            match command {
                Command::Send { payload, destination } => {
                    self.originate(vehicle, destination, payload, queue)?;
                }
                Command::ScheduleDecide { at, ticket } => {
                    Event::Decide { vehicle, ticket }.schedule_at(queue, at);
                }
            }
        }
        Ok(())
    }

    fn on_decide(&mut self, vehicle: VehicleId, ticket: Ticket, now: SimTime) -> SimResult<()> {
        // The buffer belongs to the live cycle; an old Decide must not drain it.
        if !self.engine.is_current(vehicle, ticket) {
            self.stale("decide", vehicle);
            return Ok(());
        }
        let received = self.registry.take_payloads(vehicle)?;
        let rec = self.registry.get(vehicle)?;
        let ctx = DecideContext { now, self_coverage: rec.self_coverage.as_ref(), received: &received };
        let result = self.engine.decide(vehicle, ticket, &ctx);
        match result {
            Ok(None) => self.stale("decide", vehicle),
            Ok(Some(outcome)) => {
                self.counters.decisions += 1;
                if let Some(t) = outcome.transition {
                    self.registry.convert_to_relay(t.vehicle, t.at)?;
                    self.counters.conversions += 1;
                }
                if let Some(record) = outcome.record {
                    self.decisions.push(record);
                }
                self.pending_outcomes.push(outcome);
            }
            Err(e) => {
                warn!("vehicle {vehicle} stays parked after failed decision: {e}");
                self.counters.failed_decisions += 1;
            }
        }
        Ok(())
    }
}

impl<K: HookSink> EventHandler<Event> for SimState<K> {
    fn handle(&mut self, event: ScheduledEvent<Event>, queue: &mut EventQueue<Event>) {
        trace!("t={} {}", event.time, event.description);
        if let Err(e) = self.dispatch(event.event, queue) {
            error!("event at t={} failed: {e}", event.time);
            self.error.get_or_insert(e);
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner: an event queue plus the state its events act on.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<K: HookSink = NoopSink> {
    pub queue: EventQueue<Event>,
    pub state: SimState<K>,
    finished: bool,
}

impl<K: HookSink> Sim<K> {
    pub(crate) fn new(queue: EventQueue<Event>, state: SimState<K>) -> Self {
        Self { queue, state, finished: false }
    }

    /// Run every event before the stop time, then write final statistics.
    ///
    /// Stops at the first event that fails with an error other than a
    /// decision failure.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        if self.finished {
            return Err(SimError::Config("simulation already ran".into()));
        }
        while let Some(event) = self.queue.pop_next() {
            let time = event.time;
            observer.on_event(time, &event.event);
            let collect = matches!(event.event, Event::CollectStats);

            self.state.handle(event, &mut self.queue);
            if let Some(e) = self.state.error.take() {
                return Err(e);
            }
            for outcome in self.state.pending_outcomes.drain(..) {
                observer.on_decision(&outcome);
            }
            if collect {
                observer.on_collect(time, &self.state.registry);
            }
        }
        self.finished = true;

        let state = &mut self.state;
        stats::write_final(state.engine.sink_mut(), &state.registry, state.city, state.mask.as_ref())?;

        let summary = self.summary();
        info!(
            "run finished at t={}: {} events, {} decisions, {} relays",
            summary.end_time, summary.events_executed, summary.counters.decisions, summary.relays
        );
        observer.on_sim_end(&summary);
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        let registry = &self.state.registry;
        RunSummary {
            end_time: self.queue.now(),
            events_executed: self.queue.executed(),
            vehicles_seen: registry.len(),
            parked: registry.count_role(Role::Parked),
            relays: registry.count_role(Role::RoadsideUnit),
            counters: self.state.counters,
        }
    }

    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn registry(&self) -> &VehicleRegistry {
        &self.state.registry
    }

    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.state.decisions
    }

    pub fn sink(&self) -> &K {
        self.state.engine.sink()
    }

    /// Consume the simulation, returning the hook sink (to flush it).
    pub fn into_sink(self) -> K {
        self.state.engine.into_sink()
    }
}
