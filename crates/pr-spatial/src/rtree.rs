//! In-memory `SpatialIndex` backed by an R-tree.

use std::collections::BTreeMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use pr_core::{GeoPoint, PointId, VehicleId};

use crate::{FeatureType, Neighbor, SpatialError, SpatialIndex, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a `[lon, lat]` point and its handle.
#[derive(Clone, Debug, PartialEq)]
struct PointEntry {
    point: [f64; 2],
    id: PointId,
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PointEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[derive(Clone, Debug)]
struct PointRecord {
    kind: FeatureType,
    owner: VehicleId,
    position: GeoPoint,
}

#[inline]
fn key(p: GeoPoint) -> [f64; 2] {
    [p.lon, p.lat]
}

// ── RTreeIndex ────────────────────────────────────────────────────────────────

/// R-tree over point positions plus a side table of kinds and owners.
///
/// Moving a point is a remove + insert in the tree; positions are the
/// source of truth in the side table.
#[derive(Default)]
pub struct RTreeIndex {
    tree: RTree<PointEntry>,
    records: BTreeMap<PointId, PointRecord>,
    counts: BTreeMap<FeatureType, usize>,
    next_id: u64,
}

impl RTreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn kind(&self, id: PointId) -> Option<FeatureType> {
        self.records.get(&id).map(|r| r.kind)
    }

    fn record_mut(&mut self, id: PointId) -> SpatialResult<&mut PointRecord> {
        self.records.get_mut(&id).ok_or(SpatialError::PointNotFound(id))
    }
}

impl SpatialIndex for RTreeIndex {
    fn add_point(&mut self, kind: FeatureType, position: GeoPoint, owner: VehicleId) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        self.tree.insert(PointEntry { point: key(position), id });
        self.records.insert(id, PointRecord { kind, owner, position });
        *self.counts.entry(kind).or_default() += 1;
        id
    }

    fn update_point(&mut self, id: PointId, position: GeoPoint) -> SpatialResult<()> {
        let record = self.record_mut(id)?;
        let old = key(record.position);
        record.position = position;
        self.tree.remove(&PointEntry { point: old, id });
        self.tree.insert(PointEntry { point: key(position), id });
        Ok(())
    }

    fn set_kind(&mut self, id: PointId, kind: FeatureType) -> SpatialResult<()> {
        let record = self.record_mut(id)?;
        let old = std::mem::replace(&mut record.kind, kind);
        if let Some(n) = self.counts.get_mut(&old) {
            *n = n.saturating_sub(1);
        }
        *self.counts.entry(kind).or_default() += 1;
        Ok(())
    }

    fn remove_point(&mut self, id: PointId) -> SpatialResult<()> {
        let record = self.records.remove(&id).ok_or(SpatialError::PointNotFound(id))?;
        self.tree.remove(&PointEntry { point: key(record.position), id });
        if let Some(n) = self.counts.get_mut(&record.kind) {
            *n = n.saturating_sub(1);
        }
        Ok(())
    }

    fn count_by_type(&self, kind: FeatureType) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    fn position(&self, id: PointId) -> Option<GeoPoint> {
        self.records.get(&id).map(|r| r.position)
    }

    fn within_bbox(
        &self,
        south_west: GeoPoint,
        north_east: GeoPoint,
        kinds: &[FeatureType],
    ) -> Vec<Neighbor> {
        let envelope = AABB::from_corners(key(south_west), key(north_east));
        let mut hits: Vec<Neighbor> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter_map(|entry| {
                let r = self.records.get(&entry.id)?;
                kinds.contains(&r.kind).then_some(Neighbor {
                    point: entry.id,
                    owner: r.owner,
                    kind: r.kind,
                    position: r.position,
                    distance_m: 0.0,
                })
            })
            .collect();
        hits.sort_by_key(|n| (n.owner, n.point));
        hits
    }
}
