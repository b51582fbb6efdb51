//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can key `BTreeMap`s (which keeps
//! iteration order, and therefore every run, deterministic).

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Vehicle identifier as it appears in the mobility feed.  Parked cars
    /// and relays keep the id of the vehicle they were created from.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Packet identifier, assigned at send time by the network.
    pub struct PacketId(u64);
}

typed_id! {
    /// Handle of a point stored in a spatial index.
    pub struct PointId(u64);
}
