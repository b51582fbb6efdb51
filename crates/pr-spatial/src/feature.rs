//! Kinds of indexed entities.

use crate::{SpatialError, SpatialResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureType {
    Building,
    Vehicle,
    RoadsideUnit,
    ParkedCar,
}

impl FeatureType {
    pub const ALL: [FeatureType; 4] = [
        FeatureType::Building,
        FeatureType::Vehicle,
        FeatureType::RoadsideUnit,
        FeatureType::ParkedCar,
    ];

    /// Numeric feature code as stored in GIS layers.
    pub fn code(self) -> u32 {
        match self {
            FeatureType::Building => 9790,
            FeatureType::Vehicle => 2222,
            FeatureType::RoadsideUnit => 2223,
            FeatureType::ParkedCar => 2224,
        }
    }

    pub fn from_code(code: u32) -> SpatialResult<Self> {
        FeatureType::ALL
            .into_iter()
            .find(|f| f.code() == code)
            .ok_or(SpatialError::UnknownFeature(code))
    }
}
