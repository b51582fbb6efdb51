//! Per-vehicle state.

use std::collections::{BTreeMap, BTreeSet};

use pr_core::{GeoPoint, PacketId, PointId, SimTime, VehicleId};
use pr_grid::{CoverageMap, Signal};
use pr_network::{CoverageMaps, Payload, SelfCoverageMap};

use crate::Role;

/// A neighbour's coverage map as last heard by a relay.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborMap {
    pub map: CoverageMap,
    /// 1 when the owner sent it, 2 when it was forwarded by another relay.
    pub hops: u32,
    pub updated: SimTime,
}

#[derive(Clone, Debug)]
pub struct VehicleRecord {
    pub id: VehicleId,
    pub role: Role,
    /// Present in the latest mobility batch.
    pub active: bool,
    pub position: GeoPoint,
    pub speed: f64,
    /// First appearance in the feed.
    pub created: SimTime,
    /// Start of the current trip; tags the trip's beacon chain.
    pub trip_started: SimTime,
    pub parked_at: Option<SimTime>,
    pub converted_at: Option<SimTime>,
    /// Handle in the spatial index while the vehicle is indexed.
    pub point: Option<PointId>,
    /// Observed coverage around a parked car or relay.
    pub self_coverage: Option<CoverageMap>,
    /// Payloads kept for the decision engine.
    pub payload_buffer: Vec<Payload>,
    /// Maps received from other relays, by owner.
    pub neighbor_maps: BTreeMap<VehicleId, NeighborMap>,
    /// Ids of every packet this vehicle already handled.
    pub seen_packets: BTreeSet<PacketId>,
}

impl VehicleRecord {
    pub fn new(id: VehicleId, position: GeoPoint, speed: f64, created: SimTime) -> Self {
        Self {
            id,
            role: Role::Moving,
            active: true,
            position,
            speed,
            created,
            trip_started: created,
            parked_at: None,
            converted_at: None,
            point: None,
            self_coverage: None,
            payload_buffer: Vec::new(),
            neighbor_maps: BTreeMap::new(),
            seen_packets: BTreeSet::new(),
        }
    }

    /// Store `strength` at the cell containing `at`.  Returns `false` if the
    /// vehicle has no self-coverage map or `at` lies outside it.
    pub fn record_signal(&mut self, at: GeoPoint, strength: Signal) -> bool {
        match self.self_coverage.as_mut().and_then(|m| m.get_geo_mut(at)) {
            Some(cell) => {
                *cell = strength;
                true
            }
            None => false,
        }
    }

    /// Store the maps in a reply from `sender`, replacing older copies.
    /// The vehicle's own map is skipped.
    pub fn remember_maps(&mut self, reply: CoverageMaps, sender: VehicleId, now: SimTime) {
        for entry in reply.maps {
            if entry.owner == self.id {
                continue;
            }
            let hops = if entry.owner == sender { 1 } else { 2 };
            self.neighbor_maps.insert(entry.owner, NeighborMap { map: entry.map, hops, updated: now });
        }
    }

    /// Maps heard directly from their owners after `since`, ascending by owner.
    pub fn fresh_neighbor_maps(&self, since: SimTime) -> impl Iterator<Item = SelfCoverageMap> + '_ {
        self.neighbor_maps
            .iter()
            .filter(move |(_, n)| n.hops == 1 && n.updated > since)
            .map(|(&owner, n)| SelfCoverageMap { owner, map: n.map.clone() })
    }
}
