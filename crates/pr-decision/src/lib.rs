//! `pr-decision`: the per-vehicle relay decision cycle.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`params`]  | `DecisionParams`, `RequestReach`                                  |
//! | [`state`]   | `DecisionState`, `Ticket` (expected-state tag for queued events)  |
//! | [`command`] | `Command`, `RoleTransition`, `DecisionOutcome`                    |
//! | [`score`]   | `CoverageScore`, `score_coverage`: the cell coverage effects sum |
//! | [`record`]  | `DecisionRecord`: per-decision statistics row                    |
//! | [`engine`]  | `DecisionEngine<K>`                                               |
//! | [`error`]   | `DecisionError`, `DecisionResult<T>`                              |
//!
//! # Design notes
//!
//! The engine never touches the vehicle registry or the event queue.  It
//! reads what the simulation hands it and answers with [`Command`]s and an
//! optional [`RoleTransition`]; the simulation applies them.  This keeps the
//! cycle
//!
//! ```text
//! Idle ─trigger─► RequestingMaps ─decide─► Deciding ─► ConvertedToRelay
//!                                                   └► RemainedParked
//!                                                   └► Failed
//! ```
//!
//! testable without a running simulation.

pub mod command;
pub mod engine;
pub mod error;
pub mod params;
pub mod record;
pub mod score;
pub mod state;


pub use command::{Command, DecisionOutcome, RoleTransition};
pub use engine::{DecideContext, DecisionEngine, TriggerContext};
pub use error::{DecisionError, DecisionResult};
pub use params::{DecisionParams, RequestReach};
pub use record::DecisionRecord;
pub use score::{CoverageScore, ScoredMaps, score_coverage};
pub use state::{DecisionState, Ticket};
