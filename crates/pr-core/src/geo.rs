//! Geographic coordinates and the arcsecond cell grid.
//!
//! Cell coordinates are geographic degrees scaled by 3600 and floored, so
//! one cell spans one arcsecond (about 31 m of latitude).  `x` follows
//! longitude and `y` follows latitude; increasing `y` is north.

/// Degrees of arc covered by one metre, as used by the planar metric.
pub const DEGREES_PER_METER: f64 = 0.000_008_992_5;

/// Cells (arcseconds) per degree.
pub const CELLS_PER_DEGREE: f64 = 3_600.0;

/// Metres spanned by one cell along either axis under the planar metric.
#[inline]
pub fn meters_per_cell() -> f64 {
    1.0 / (DEGREES_PER_METER * CELLS_PER_DEGREE)
}

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 position.  Constructed as `(lon, lat)` to match the `(x, y)`
/// order used everywhere else.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// The cell containing this point.
    #[inline]
    pub fn cell(self) -> CellCoord {
        CellCoord {
            x: (self.lon * CELLS_PER_DEGREE).floor() as i32,
            y: (self.lat * CELLS_PER_DEGREE).floor() as i32,
        }
    }

    /// Position in arcsecond units, the projection used by planar tests.
    #[inline]
    pub fn arcsec(self) -> [f64; 2] {
        [self.lon * CELLS_PER_DEGREE, self.lat * CELLS_PER_DEGREE]
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Flat-earth distance in metres: Euclidean distance in degrees divided
    /// by `DEGREES_PER_METER`.
    pub fn planar_distance_m(self, other: GeoPoint) -> f64 {
        let dx = other.lon - self.lon;
        let dy = other.lat - self.lat;
        (dx * dx + dy * dy).sqrt() / DEGREES_PER_METER
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Integer arcsecond coordinate of a cell, independent of any grid origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Geographic position of the cell's centre.
    pub fn center(self) -> GeoPoint {
        GeoPoint::new(
            (self.x as f64 + 0.5) / CELLS_PER_DEGREE,
            (self.y as f64 + 0.5) / CELLS_PER_DEGREE,
        )
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{};{}", self.x, self.y)
    }
}

// ── DistanceMetric ────────────────────────────────────────────────────────────

/// How radio range between two positions is measured.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DistanceMetric {
    #[default]
    Haversine,
    Planar,
}

impl DistanceMetric {
    #[inline]
    pub fn distance_m(self, a: GeoPoint, b: GeoPoint) -> f64 {
        match self {
            DistanceMetric::Haversine => a.distance_m(b),
            DistanceMetric::Planar => a.planar_distance_m(b),
        }
    }
}
