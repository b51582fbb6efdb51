//! `pr-fleet`: the vehicle registry.
//!
//! Every vehicle ever seen in the mobility feed has one [`VehicleRecord`],
//! keyed by its feed id.  Records are never deleted: a vehicle that drops
//! out of the feed is marked inactive, and may park, become a relay, and
//! finally depart.  The registry also owns the spatial index so record
//! positions and index points cannot drift apart.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`role`]     | `Role`                                                 |
//! | [`record`]   | `VehicleRecord`, `NeighborMap`                         |
//! | [`registry`] | `VehicleRegistry`: batch application, role changes    |
//! | [`error`]    | `FleetError`, `FleetResult<T>`                         |

pub mod error;
pub mod record;
pub mod registry;
pub mod role;


pub use error::{FleetError, FleetResult};
pub use record::{NeighborMap, VehicleRecord};
pub use registry::{BatchOutcome, VehicleRegistry};
pub use role::Role;
