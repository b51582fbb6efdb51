//! `pr-core`: foundational types for the `parkrelay` simulator.
//!
//! Every other `pr-*` crate depends on this one.  It has no `pr-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `PacketId`, `PointId`                      |
//! | [`geo`]         | `GeoPoint`, `CellCoord`, `DistanceMetric`               |
//! | [`time`]        | `SimTime`, `SimClock`, `SimConfig`                      |
//! | [`rng`]         | `SimRng` (global), `VehicleRng` (per-vehicle)           |
//! | [`hooks`]       | `Hook`, `HookSet`, `HookSink`, `NoopSink`, `MemorySink` |
//! | [`error`]       | `PrError`, `PrResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, time and geo types. |

pub mod error;
pub mod geo;
pub mod hooks;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PrError, PrResult};
pub use geo::{CellCoord, DistanceMetric, GeoPoint};
pub use hooks::{Hook, HookSet, HookSink, MemorySink, NoopSink};
pub use ids::{PacketId, PointId, VehicleId};
pub use rng::{SimRng, VehicleRng};
pub use time::{SimClock, SimConfig, SimTime};
