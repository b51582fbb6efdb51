//! `pr-schedule`: simulated time and its inputs.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`event_queue`] | `EventQueue<E>`, `ScheduledEvent<E>`, `EventHandler<E>`      |
//! | [`mobility`]    | `FcdVehicle`, `MobilityBatch`, `BatchDiff`, `reconcile`, `city_bounds` |
//! | [`loader`]      | `load_mobility_csv`, `load_mobility_tsv`, `load_mobility_reader` |
//! | [`lifetime`]    | `ParkingLifetime`: parked-duration models                   |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                         |
//!
//! # Execution model (summary)
//!
//! ```text
//! loop:
//!     (t, event) = earliest pending event     ; ties: insertion order
//!     if t >= stop_time: stop
//!     now = t
//!     handler.handle(event, queue)           ; may schedule more events
//! ```
//!
//! Handlers run to completion one at a time; nothing executes concurrently.

pub mod error;
pub mod event_queue;
pub mod lifetime;
pub mod loader;
pub mod mobility;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::{EventHandler, EventQueue, ScheduledEvent};
pub use lifetime::ParkingLifetime;
pub use loader::{load_mobility_csv, load_mobility_reader, load_mobility_tsv};
pub use mobility::{BatchDiff, FcdVehicle, MobilityBatch, city_bounds, reconcile};
