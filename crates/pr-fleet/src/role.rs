//! Vehicle roles.

use std::fmt;

use pr_spatial::FeatureType;

/// What a vehicle currently is in the simulation.
///
/// ```text
/// Moving ──(leaves feed)──► Parked ──(positive decision)──► RoadsideUnit
///   ▲                          │                                 │
///   └──────(reappears)─────────┘                                 │
///             Parked / RoadsideUnit ──(lifetime expires)──► Departed
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    Moving,
    Parked,
    RoadsideUnit,
    Departed,
}

impl Role {
    /// Spatial feature type of a vehicle in this role; departed vehicles are
    /// not indexed.
    pub fn feature(self) -> Option<FeatureType> {
        match self {
            Role::Moving => Some(FeatureType::Vehicle),
            Role::Parked => Some(FeatureType::ParkedCar),
            Role::RoadsideUnit => Some(FeatureType::RoadsideUnit),
            Role::Departed => None,
        }
    }

    /// Parked cars and relays: stationary nodes that sense coverage and
    /// take part in map exchange.
    #[inline]
    pub fn is_fixed(self) -> bool {
        matches!(self, Role::Parked | Role::RoadsideUnit)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Moving => "moving",
            Role::Parked => "parked",
            Role::RoadsideUnit => "rsu",
            Role::Departed => "departed",
        })
    }
}
