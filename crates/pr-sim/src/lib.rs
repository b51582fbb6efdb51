//! `pr-sim`: the event loop tying vehicles, radio and decisions together.
//!
//! # Event flow
//!
//! ```text
//! MobilityUpdate(i) ─► new vehicles start a Beacon chain
//!                   └► vehicles leaving the feed park:
//!                        Trigger at +triggerDelay, ParkingExpired at +lifetime
//! Beacon            ─► broadcast; fixed nodes within range record signal
//! Trigger           ─► map request sent, Decide at +waiting time
//! Deliver           ─► receive rules, forwarding, payload processing
//! Decide            ─► score; positive → relay
//! CollectStats      ─► periodic hook rows
//! ```
//!
//! Every event runs to completion before the next is popped; events at the
//! same instant run in the order they were scheduled.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`config`]   | `ScenarioConfig` and its sections                     |
//! | [`event`]    | `Event`: tagged simulation events                    |
//! | [`sim`]      | `Sim`: state and dispatcher                          |
//! | [`radio`]    | transmission, delivery and payload processing         |
//! | [`stats`]    | `Counters`, city maps, periodic and final statistics  |
//! | [`builder`]  | `SimBuilder`                                          |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `RunSummary`           |
//! | [`error`]    | `SimError`, `SimResult<T>`                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let config = ScenarioConfig::load("scenario.toml")?;
//! let batches = pr_schedule::load_mobility_tsv("fcd.tsv", config.sim.stop_time())?;
//! let mut sim = SimBuilder::new(config, batches).build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod observer;
pub mod radio;
pub mod sim;
pub mod stats;


pub use builder::SimBuilder;
pub use config::{FixedRoadsideUnit, ParkingConfig, ScenarioConfig, StatsConfig};
pub use error::{SimError, SimResult};
pub use event::Event;
pub use observer::{NoopObserver, RunSummary, SimObserver};
pub use sim::Sim;
pub use stats::{CityMaps, Counters};
