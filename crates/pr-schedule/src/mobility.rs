//! Mobility feed types and batch reconciliation.
//!
//! The feed is a sequence of timestep snapshots.  A vehicle is "present"
//! in a snapshot if it appears in it; reconciling a snapshot against the
//! set of currently active vehicles yields three disjoint id sets.  Vehicles
//! that disappear are reported as `missing`, never deleted: their pending
//! decisions and coverage maps outlive detection gaps.

use std::collections::BTreeSet;

use pr_core::{CellCoord, GeoPoint, SimTime, VehicleId};

/// One vehicle observation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FcdVehicle {
    pub id: VehicleId,
    pub position: GeoPoint,
    pub speed: f64,
}

/// All observations for one timestep.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MobilityBatch {
    pub time: SimTime,
    pub vehicles: Vec<FcdVehicle>,
}

impl MobilityBatch {
    pub fn new(time: SimTime, vehicles: Vec<FcdVehicle>) -> Self {
        Self { time, vehicles }
    }

    pub fn ids(&self) -> BTreeSet<VehicleId> {
        self.vehicles.iter().map(|v| v.id).collect()
    }
}

/// Result of reconciling one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchDiff {
    /// In the batch, not currently active.
    pub created: Vec<FcdVehicle>,
    /// In the batch and currently active.
    pub updated: Vec<FcdVehicle>,
    /// Currently active, absent from the batch.
    pub missing: Vec<VehicleId>,
}

impl BatchDiff {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.missing.is_empty()
    }
}

/// Split `batch` against the set of `active` vehicle ids.
///
/// Output order is ascending id within each list.  A vehicle listed twice in
/// one batch keeps its last observation.
pub fn reconcile(active: &BTreeSet<VehicleId>, batch: &MobilityBatch) -> BatchDiff {
    let mut latest: std::collections::BTreeMap<VehicleId, FcdVehicle> = Default::default();
    for v in &batch.vehicles {
        latest.insert(v.id, *v);
    }
    let mut diff = BatchDiff::default();
    for (id, v) in &latest {
        if active.contains(id) {
            diff.updated.push(*v);
        } else {
            diff.created.push(*v);
        }
    }
    diff.missing = active.iter().filter(|id| !latest.contains_key(id)).copied().collect();
    diff
}

/// Cell rectangle, as `(top_left, width, height)`, covering every position
/// in the feed.  `None` for a feed without observations.
pub fn city_bounds(batches: &[MobilityBatch]) -> Option<(CellCoord, usize, usize)> {
    let mut cells = batches.iter().flat_map(|b| b.vehicles.iter().map(|v| v.position.cell()));
    let first = cells.next()?;
    let (mut west, mut east, mut south, mut north) = (first.x, first.x, first.y, first.y);
    for c in cells {
        west = west.min(c.x);
        east = east.max(c.x);
        south = south.min(c.y);
        north = north.max(c.y);
    }
    Some((
        CellCoord::new(west, north),
        (east - west + 1) as usize,
        (north - south + 1) as usize,
    ))
}
