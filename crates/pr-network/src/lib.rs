//! `pr-network`: the logical radio network.
//!
//! Packets are immutable values.  The network (owned by the simulator)
//! assigns ids at send time through a [`PacketIdGenerator`], decides who
//! hears a transmission, and hands each copy to [`receive`], which applies
//! the per-destination delivery rules: drop own and duplicate packets,
//! decrement broadcast hop budgets, test geocast areas.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`packet`]  | `Packet`, `Destination`, `Circle`, `PacketIdGenerator`        |
//! | [`payload`] | `Payload`, `PayloadKind`, `PayloadContent`, `Beacon`, `CoverageMapRequest`, `SelfCoverageMap`, `CoverageMaps` |
//! | [`receive`] | `receive`, `Reception`: destination handling at a receiver   |
//! | [`signal`]  | `SignalModel`, `SteppedSignalModel`                           |
//! | [`config`]  | `NetworkConfig`                                               |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                            |

pub mod config;
pub mod error;
pub mod packet;
pub mod payload;
pub mod receive;
pub mod signal;

#[cfg(test)]
mod tests;

pub use config::NetworkConfig;
pub use error::{NetworkError, NetworkResult};
pub use packet::{Circle, Destination, Packet, PacketIdGenerator};
pub use payload::{
    Beacon, CoverageMapRequest, CoverageMaps, Payload, PayloadContent, PayloadKind, SelfCoverageMap,
};
pub use receive::{Reception, receive};
pub use signal::{SignalModel, SteppedSignalModel};
