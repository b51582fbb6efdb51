//! The abstract spatial index.

use pr_core::geo::DEGREES_PER_METER;
use pr_core::{DistanceMetric, GeoPoint, PointId, VehicleId};

use crate::{FeatureType, SpatialResult};

/// One query hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub point: PointId,
    pub owner: VehicleId,
    pub kind: FeatureType,
    pub position: GeoPoint,
    pub distance_m: f64,
}

/// Operations the simulator needs from a spatial store.
///
/// Query results are sorted by owner id so callers iterate in a stable
/// order regardless of the index's internal layout.
pub trait SpatialIndex {
    fn add_point(&mut self, kind: FeatureType, position: GeoPoint, owner: VehicleId) -> PointId;

    fn update_point(&mut self, id: PointId, position: GeoPoint) -> SpatialResult<()>;

    /// Change the type of an existing point (a vehicle parking, a parked car
    /// becoming a relay).
    fn set_kind(&mut self, id: PointId, kind: FeatureType) -> SpatialResult<()>;

    fn remove_point(&mut self, id: PointId) -> SpatialResult<()>;

    fn count_by_type(&self, kind: FeatureType) -> usize;

    fn position(&self, id: PointId) -> Option<GeoPoint>;

    /// Every point of one of `kinds` inside the box `[south_west, north_east]`.
    fn within_bbox(
        &self,
        south_west: GeoPoint,
        north_east: GeoPoint,
        kinds: &[FeatureType],
    ) -> Vec<Neighbor>;

    /// Every point of one of `kinds` within `radius_m` of `center` under
    /// `metric`.  The default narrows with a box query, then filters exactly.
    fn within_radius(
        &self,
        center: GeoPoint,
        radius_m: f64,
        metric: DistanceMetric,
        kinds: &[FeatureType],
    ) -> Vec<Neighbor> {
        // Longitude degrees shrink with latitude; widen the box accordingly
        // plus a small margin for the haversine/planar scale difference.
        let half_lat = radius_m * DEGREES_PER_METER * 1.01;
        let half_lon = half_lat / center.lat.to_radians().cos().abs().max(0.01);
        let sw = GeoPoint::new(center.lon - half_lon, center.lat - half_lat);
        let ne = GeoPoint::new(center.lon + half_lon, center.lat + half_lat);
        self.within_bbox(sw, ne, kinds)
            .into_iter()
            .filter_map(|mut n| {
                n.distance_m = metric.distance_m(center, n.position);
                (n.distance_m <= radius_m).then_some(n)
            })
            .collect()
    }
}
