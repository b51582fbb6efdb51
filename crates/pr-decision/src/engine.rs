//! `DecisionEngine`: runs every parked car's request/evaluate cycle.

use std::collections::BTreeMap;

use log::{Level, debug, error, log_enabled, trace};

use pr_core::{GeoPoint, Hook, HookSink, SimTime, VehicleId};
use pr_fleet::Role;
use pr_grid::CoverageMap;
use pr_network::{
    Circle, CoverageMapRequest, CoverageMaps, Destination, Payload, PayloadContent, PayloadKind,
};

use crate::{
    Command, DecisionError, DecisionOutcome, DecisionParams, DecisionRecord, DecisionResult,
    DecisionState, RequestReach, RoleTransition, ScoredMaps, Ticket, score_coverage,
};

/// What `trigger` needs to know about the vehicle.
#[derive(Copy, Clone, Debug)]
pub struct TriggerContext {
    pub now: SimTime,
    pub position: GeoPoint,
    /// Radius of a `geocastRadius` request.
    pub max_range_m: f64,
}

/// What `decide` needs to know about the vehicle.
#[derive(Copy, Clone, Debug)]
pub struct DecideContext<'a> {
    pub now: SimTime,
    pub self_coverage: Option<&'a CoverageMap>,
    /// Payloads buffered while the vehicle was requesting maps.
    pub received: &'a [Payload],
}

#[derive(Copy, Clone, Debug)]
struct Cycle {
    epoch: u32,
    state: DecisionState,
}

/// Per-vehicle decision state machines plus the sink they report to.
///
/// The hooks the engine writes are looked up once at construction.
pub struct DecisionEngine<K: HookSink> {
    params: DecisionParams,
    sink: K,
    write_effects: bool,
    dump_maps: bool,
    cycles: BTreeMap<VehicleId, Cycle>,
    next_epoch: u32,
}

impl<K: HookSink> DecisionEngine<K> {
    pub fn new(params: DecisionParams, sink: K) -> DecisionResult<Self> {
        params.validate()?;
        let write_effects = sink.is_enabled(Hook::DecisionCellCoverageEffects);
        let dump_maps = sink.is_enabled(Hook::DecisionMaps);
        Ok(Self { params, sink, write_effects, dump_maps, cycles: BTreeMap::new(), next_epoch: 0 })
    }

    pub fn params(&self) -> &DecisionParams {
        &self.params
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    // ── Cycle bookkeeping ─────────────────────────────────────────────────

    /// Start a fresh cycle for `vehicle` in `Idle`.  The returned ticket must
    /// accompany the `Trigger` event.
    pub fn arm(&mut self, vehicle: VehicleId) -> Ticket {
        self.next_epoch = self.next_epoch.wrapping_add(1);
        let cycle = Cycle { epoch: self.next_epoch, state: DecisionState::Idle };
        self.cycles.insert(vehicle, cycle);
        Ticket { epoch: cycle.epoch, state: cycle.state }
    }

    /// Forget `vehicle`'s cycle; any queued event for it becomes stale.
    pub fn disarm(&mut self, vehicle: VehicleId) -> Option<DecisionState> {
        self.cycles.remove(&vehicle).map(|c| c.state)
    }

    pub fn state(&self, vehicle: VehicleId) -> Option<DecisionState> {
        self.cycles.get(&vehicle).map(|c| c.state)
    }

    /// Only vehicles waiting for replies accept coverage maps.
    pub fn is_requesting(&self, vehicle: VehicleId) -> bool {
        self.state(vehicle) == Some(DecisionState::RequestingMaps)
    }

    /// Whether `ticket` still names `vehicle`'s live cycle in the state it
    /// expects.  Callers check this before touching per-cycle buffers.
    pub fn is_current(&self, vehicle: VehicleId, ticket: Ticket) -> bool {
        self.cycles.get(&vehicle).is_some_and(|c| c.epoch == ticket.epoch && c.state == ticket.state)
    }

    fn accept(&self, vehicle: VehicleId, ticket: Ticket, what: &str) -> bool {
        match self.cycles.get(&vehicle) {
            Some(_) if self.is_current(vehicle, ticket) => true,
            found => {
                debug!(
                    "stale {what} for vehicle {vehicle}: expected {:?}, found {:?}",
                    ticket,
                    found.map(|c| (c.epoch, c.state))
                );
                false
            }
        }
    }

    fn set_state(&mut self, vehicle: VehicleId, state: DecisionState) {
        if let Some(c) = self.cycles.get_mut(&vehicle) {
            c.state = state;
        }
    }

    // ── Idle → RequestingMaps ─────────────────────────────────────────────

    /// Send the map request and schedule the decision.
    ///
    /// Returns `Ok(None)` without side effects if `ticket` is stale.
    pub fn trigger(
        &mut self,
        vehicle: VehicleId,
        ticket: Ticket,
        ctx: &TriggerContext,
    ) -> DecisionResult<Option<Vec<Command>>> {
        if !self.accept(vehicle, ticket, "trigger") {
            return Ok(None);
        }
        let destination = match self.params.request_reach {
            RequestReach::OneHop => Destination::Broadcast { hop_limit: 1 },
            RequestReach::TwoHop => Destination::Broadcast { hop_limit: 2 },
            RequestReach::GeocastRadius => {
                Destination::Geocast(Circle { center: ctx.position, radius_m: ctx.max_range_m })
            }
        };
        // Relays asked for depth 2 add the maps of their own relay neighbours.
        let depth = match &destination {
            Destination::Broadcast { hop_limit } => *hop_limit,
            _ => 1,
        };
        let payload = CoverageMapRequest { depth }.to_payload()?;

        self.set_state(vehicle, DecisionState::RequestingMaps);
        debug!("vehicle {vehicle} requesting maps ({}) at t={}", self.params.request_reach, ctx.now);

        Ok(Some(vec![
            Command::Send { payload, destination },
            Command::ScheduleDecide {
                at: ctx.now + self.params.map_request_waiting_time(),
                ticket: Ticket { epoch: ticket.epoch, state: DecisionState::RequestingMaps },
            },
        ]))
    }

    // ── RequestingMaps → Deciding → terminal ──────────────────────────────

    /// Evaluate the buffered replies.
    ///
    /// Returns `Ok(None)` if `ticket` is stale.  A reply that fails to decode
    /// leaves the vehicle in [`DecisionState::Failed`] and returns the error.
    pub fn decide(
        &mut self,
        vehicle: VehicleId,
        ticket: Ticket,
        ctx: &DecideContext<'_>,
    ) -> DecisionResult<Option<DecisionOutcome>> {
        if !self.accept(vehicle, ticket, "decide") {
            return Ok(None);
        }
        self.set_state(vehicle, DecisionState::Deciding);
        match self.evaluate(vehicle, ctx) {
            Ok(outcome) => {
                self.set_state(vehicle, outcome.state);
                Ok(Some(outcome))
            }
            Err(e) => {
                error!("decision for vehicle {vehicle} failed: {e}");
                self.set_state(vehicle, DecisionState::Failed);
                Err(e)
            }
        }
    }

    fn evaluate(&mut self, vehicle: VehicleId, ctx: &DecideContext<'_>) -> DecisionResult<DecisionOutcome> {
        // A neighbour's map may arrive in several replies; the latest copy wins.
        let mut by_owner: BTreeMap<VehicleId, CoverageMap> = BTreeMap::new();
        for (index, payload) in ctx.received.iter().filter(|p| p.kind == PayloadKind::CoverageMaps).enumerate() {
            let reply = payload
                .decode::<CoverageMaps>()
                .map_err(|source| DecisionError::Decode { vehicle, index, source })?;
            for entry in reply.maps.into_iter().filter(|e| e.owner != vehicle) {
                by_owner.insert(entry.owner, entry.map);
            }
        }
        let replies: Vec<CoverageMap> = by_owner.into_values().collect();

        if replies.is_empty() {
            debug!("vehicle {vehicle} received no coverage maps, remaining parked");
            return Ok(DecisionOutcome {
                vehicle,
                state: DecisionState::RemainedParked,
                score: None,
                transition: None,
                record: None,
            });
        }

        let own = ctx.self_coverage.ok_or(DecisionError::MissingSelfCoverage(vehicle))?;
        let scored = score_coverage(&self.params, own, &replies)?;
        let record = DecisionRecord::new(ctx.now, vehicle, scored.score, &self.params);

        if self.write_effects {
            self.sink.write_to_hook(Hook::DecisionCellCoverageEffects, &record.to_row());
        }
        if self.dump_maps || log_enabled!(Level::Trace) {
            self.dump(vehicle, ctx.now, own, &scored);
        }

        let converted = scored.score.is_positive();
        debug!(
            "vehicle {vehicle}: {} neighbour maps, dScore={} -> {}",
            replies.len(),
            scored.score.d_score,
            if converted { "relay" } else { "parked" }
        );
        Ok(DecisionOutcome {
            vehicle,
            state: if converted { DecisionState::ConvertedToRelay } else { DecisionState::RemainedParked },
            score: Some(scored.score),
            transition: converted.then_some(RoleTransition { vehicle, at: ctx.now, to: Role::RoadsideUnit }),
            record: Some(record),
        })
    }

    fn dump(&mut self, vehicle: VehicleId, now: SimTime, own: &CoverageMap, scored: &ScoredMaps) {
        let sections = [
            ("self", own.to_table()),
            ("coverage", scored.coverage.to_table()),
            ("saturation", scored.saturation.to_table()),
        ];
        for (label, table) in sections {
            let text = format!("# t={now} id={vehicle} {label}\n{}", table.trim_end());
            trace!("{text}");
            if self.dump_maps {
                self.sink.write_to_hook(Hook::DecisionMaps, &text);
            }
        }
    }
}
