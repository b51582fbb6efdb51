//! Destination handling at a receiving node.

use std::collections::BTreeSet;

use pr_core::{GeoPoint, PacketId, VehicleId};

use crate::{Destination, Packet};

/// What a node does with a packet it heard.
#[derive(Clone, Debug, PartialEq)]
pub struct Reception {
    /// Hand the payload to the node's payload processing.
    pub process: bool,
    /// Retransmit this copy.
    pub forward: Option<Packet>,
}

impl Reception {
    pub const IGNORE: Reception = Reception { process: false, forward: None };
}

/// Apply the delivery rules for `packet` heard by `me` at `position`.
///
/// Packets originated by `me` and packets whose id is already in `seen`
/// are ignored; every other id is recorded in `seen`.
pub fn receive(
    packet: &Packet,
    me: VehicleId,
    position: GeoPoint,
    seen: &mut BTreeSet<PacketId>,
) -> Reception {
    if packet.l3src == me || !seen.insert(packet.id) {
        return Reception::IGNORE;
    }
    match packet.destination {
        Destination::Unicast(target) => Reception { process: target == me, forward: None },
        Destination::Broadcast { hop_limit } => Reception {
            process: true,
            forward: (hop_limit > 1).then(|| {
                packet.relayed_by(me, Destination::Broadcast { hop_limit: hop_limit - 1 })
            }),
        },
        Destination::Geocast(area) => {
            if !area.contains(position) {
                return Reception::IGNORE;
            }
            Reception { process: true, forward: Some(packet.relayed_by(me, packet.destination)) }
        }
    }
}
