//! `VehicleRegistry`: the authoritative vehicle list.

use std::collections::BTreeMap;

use log::{debug, trace};

use pr_core::{DistanceMetric, GeoPoint, SimTime, VehicleId};
use pr_grid::{CellMap, CoverageMap};
use pr_network::Payload;
use pr_schedule::{BatchDiff, MobilityBatch, reconcile};
use pr_spatial::{FeatureType, Neighbor, RTreeIndex, SpatialIndex};

use crate::{FleetError, FleetResult, Role, VehicleRecord};

/// What applying a mobility batch changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchOutcome {
    /// Raw reconciliation of the batch against the moving set.
    pub diff: BatchDiff,
    /// Ids seen for the first time.
    pub created: Vec<VehicleId>,
    /// Parked or departed vehicles that started a new trip.
    pub reactivated: Vec<VehicleId>,
    /// Moving vehicles that left the feed in this batch.
    pub left: Vec<VehicleId>,
}

/// Vehicle records plus the spatial index over their positions.
///
/// The index is generic so tests or alternative backends can plug in; the
/// simulator uses [`RTreeIndex`].
pub struct VehicleRegistry<I: SpatialIndex = RTreeIndex> {
    records: BTreeMap<VehicleId, VehicleRecord>,
    index: I,
}

impl VehicleRegistry<RTreeIndex> {
    pub fn new() -> Self {
        Self::with_index(RTreeIndex::new())
    }
}

impl Default for VehicleRegistry<RTreeIndex> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: SpatialIndex> VehicleRegistry<I> {
    pub fn with_index(index: I) -> Self {
        Self { records: BTreeMap::new(), index }
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: VehicleId) -> FleetResult<&VehicleRecord> {
        self.records.get(&id).ok_or(FleetError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: VehicleId) -> FleetResult<&mut VehicleRecord> {
        self.records.get_mut(&id).ok_or(FleetError::NotFound(id))
    }

    pub fn role(&self, id: VehicleId) -> Option<Role> {
        self.records.get(&id).map(|r| r.role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.records.values()
    }

    pub fn iter_role(&self, role: Role) -> impl Iterator<Item = &VehicleRecord> {
        self.records.values().filter(move |r| r.role == role)
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.iter_role(role).count()
    }

    /// Vehicles currently driving in the feed.
    pub fn active_moving_count(&self) -> usize {
        self.records.values().filter(|r| r.role == Role::Moving && r.active).count()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Indexed vehicles of one of `kinds` within `radius_m` of `center`,
    /// ascending by owner id.
    pub fn neighbors(
        &self,
        center: GeoPoint,
        radius_m: f64,
        metric: DistanceMetric,
        kinds: &[FeatureType],
    ) -> Vec<Neighbor> {
        self.index.within_radius(center, radius_m, metric, kinds)
    }

    // ── Mobility ──────────────────────────────────────────────────────────

    /// Apply one feed snapshot.
    ///
    /// New ids get a `Moving` record and an index point.  Known moving
    /// vehicles are moved.  Parked and departed vehicles seen again start a
    /// new trip.  Relays stay relays: their observations are ignored.  Moving
    /// vehicles absent from the batch are marked inactive but kept.
    pub fn apply_batch(&mut self, batch: &MobilityBatch) -> FleetResult<BatchOutcome> {
        let moving = self
            .records
            .values()
            .filter(|r| r.role == Role::Moving && r.active)
            .map(|r| r.id)
            .collect();
        let diff = reconcile(&moving, batch);
        let mut outcome = BatchOutcome::default();

        for v in &diff.updated {
            let rec = self.records.get_mut(&v.id).ok_or(FleetError::NotFound(v.id))?;
            rec.position = v.position;
            rec.speed = v.speed;
            if let Some(point) = rec.point {
                self.index.update_point(point, v.position)?;
            }
        }

        for v in &diff.created {
            match self.records.get(&v.id).map(|r| r.role) {
                None => {
                    let mut rec = VehicleRecord::new(v.id, v.position, v.speed, batch.time);
                    rec.point = Some(self.index.add_point(FeatureType::Vehicle, v.position, v.id));
                    self.records.insert(v.id, rec);
                    outcome.created.push(v.id);
                }
                Some(Role::RoadsideUnit) => {
                    trace!("ignoring feed observation of relay {}", v.id);
                }
                Some(Role::Moving | Role::Parked | Role::Departed) => {
                    self.start_trip(v.id, v.position, v.speed, batch.time)?;
                    outcome.reactivated.push(v.id);
                }
            }
        }

        for &id in &diff.missing {
            let rec = self.records.get_mut(&id).ok_or(FleetError::NotFound(id))?;
            rec.active = false;
            outcome.left.push(id);
        }

        debug!(
            "batch t={}: {} new, {} reactivated, {} updated, {} left",
            batch.time,
            outcome.created.len(),
            outcome.reactivated.len(),
            diff.updated.len(),
            outcome.left.len()
        );
        outcome.diff = diff;
        Ok(outcome)
    }

    fn start_trip(
        &mut self,
        id: VehicleId,
        position: GeoPoint,
        speed: f64,
        now: SimTime,
    ) -> FleetResult<()> {
        let rec = self.records.get_mut(&id).ok_or(FleetError::NotFound(id))?;
        rec.role = Role::Moving;
        rec.active = true;
        rec.trip_started = now;
        rec.position = position;
        rec.speed = speed;
        rec.parked_at = None;
        rec.converted_at = None;
        rec.self_coverage = None;
        rec.payload_buffer.clear();
        match rec.point {
            Some(point) => {
                self.index.update_point(point, position)?;
                self.index.set_kind(point, FeatureType::Vehicle)?;
            }
            None => rec.point = Some(self.index.add_point(FeatureType::Vehicle, position, id)),
        }
        Ok(())
    }

    // ── Role changes ──────────────────────────────────────────────────────

    /// Park an inactive moving vehicle at its last position with an empty
    /// self-coverage map of `map_size × map_size` cells centred on it.
    pub fn park(&mut self, id: VehicleId, now: SimTime, map_size: usize) -> FleetResult<()> {
        let rec = self.records.get_mut(&id).ok_or(FleetError::NotFound(id))?;
        expect_role(rec, Role::Moving)?;
        let map: CoverageMap =
            CellMap::with_geographic_center(map_size, map_size, 0, rec.position)?;
        rec.role = Role::Parked;
        rec.active = false;
        rec.parked_at = Some(now);
        rec.self_coverage = Some(map);
        rec.payload_buffer.clear();
        if let Some(point) = rec.point {
            self.index.set_kind(point, FeatureType::ParkedCar)?;
        }
        debug!("vehicle {id} parked at t={now}");
        Ok(())
    }

    /// Place a fixed roadside unit that is not part of the mobility feed.
    /// It starts with an empty self-coverage map and never parks or expires.
    pub fn add_roadside_unit(
        &mut self,
        id: VehicleId,
        position: GeoPoint,
        now: SimTime,
        map_size: usize,
    ) -> FleetResult<()> {
        if self.records.contains_key(&id) {
            return Err(FleetError::Duplicate(id));
        }
        let mut rec = VehicleRecord::new(id, position, 0.0, now);
        rec.role = Role::RoadsideUnit;
        rec.active = false;
        rec.converted_at = Some(now);
        rec.self_coverage = Some(CellMap::with_geographic_center(map_size, map_size, 0, position)?);
        rec.point = Some(self.index.add_point(FeatureType::RoadsideUnit, position, id));
        self.records.insert(id, rec);
        debug!("fixed roadside unit {id} placed at {position}");
        Ok(())
    }

    /// Turn a parked car into a roadside unit.
    pub fn convert_to_relay(&mut self, id: VehicleId, now: SimTime) -> FleetResult<()> {
        let rec = self.records.get_mut(&id).ok_or(FleetError::NotFound(id))?;
        expect_role(rec, Role::Parked)?;
        rec.role = Role::RoadsideUnit;
        rec.converted_at = Some(now);
        if let Some(point) = rec.point {
            self.index.set_kind(point, FeatureType::RoadsideUnit)?;
        }
        debug!("vehicle {id} became a roadside unit at t={now}");
        Ok(())
    }

    /// Remove a parked car, a relay, or a moving vehicle that left the feed
    /// from the map.  The record is kept.
    pub fn depart(&mut self, id: VehicleId) -> FleetResult<Role> {
        let rec = self.records.get_mut(&id).ok_or(FleetError::NotFound(id))?;
        let previous = rec.role;
        let leaving = previous.is_fixed() || (previous == Role::Moving && !rec.active);
        if !leaving {
            return Err(FleetError::WrongRole { id, expected: Role::Parked, found: previous });
        }
        rec.role = Role::Departed;
        rec.self_coverage = None;
        rec.payload_buffer.clear();
        rec.neighbor_maps.clear();
        if let Some(point) = rec.point.take() {
            self.index.remove_point(point)?;
        }
        debug!("vehicle {id} departed ({previous})");
        Ok(previous)
    }

    // ── Buffers ───────────────────────────────────────────────────────────

    pub fn push_payload(&mut self, id: VehicleId, payload: Payload) -> FleetResult<()> {
        self.get_mut(id)?.payload_buffer.push(payload);
        Ok(())
    }

    /// Hand the buffered payloads to the caller, leaving the buffer empty.
    pub fn take_payloads(&mut self, id: VehicleId) -> FleetResult<Vec<Payload>> {
        Ok(std::mem::take(&mut self.get_mut(id)?.payload_buffer))
    }

    /// Self-coverage maps of every relay, ascending by id.
    pub fn relay_maps(&self) -> impl Iterator<Item = (VehicleId, &CoverageMap)> {
        self.iter_role(Role::RoadsideUnit)
            .filter_map(|r| r.self_coverage.as_ref().map(|m| (r.id, m)))
    }
}

fn expect_role(rec: &VehicleRecord, expected: Role) -> FleetResult<()> {
    if rec.role == expected {
        Ok(())
    } else {
        Err(FleetError::WrongRole { id: rec.id, expected, found: rec.role })
    }
}
