//! Packets and addressing.

use std::fmt;

use pr_core::geo::meters_per_cell;
use pr_core::{GeoPoint, PacketId, SimTime, VehicleId};

use crate::Payload;

// ── Circle ────────────────────────────────────────────────────────────────────

/// A geocast area.
///
/// Containment is a planar test in arcsecond units, the projection the cell
/// grid uses: both points are scaled to arcseconds and the radius is
/// converted at [`meters_per_cell`] metres per arcsecond.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: GeoPoint,
    pub radius_m: f64,
}

impl Circle {
    pub fn new(center: GeoPoint, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        let [cx, cy] = self.center.arcsec();
        let [px, py] = point.arcsec();
        let r = self.radius_m / meters_per_cell();
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= r * r
    }
}

// ── Destination ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Destination {
    Unicast(VehicleId),
    /// Flood up to `hop_limit` hops; a hop limit of 1 reaches direct
    /// neighbours only.
    Broadcast { hop_limit: u32 },
    Geocast(Circle),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Unicast(id) => write!(f, "unicast({id})"),
            Destination::Broadcast { hop_limit } => write!(f, "broadcast({hop_limit})"),
            Destination::Geocast(c) => write!(f, "geocast({};{};{})", c.center.lon, c.center.lat, c.radius_m),
        }
    }
}

// ── Packet ────────────────────────────────────────────────────────────────────

/// A network packet.  Forwarding produces a modified copy; the id never
/// changes across hops.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet {
    pub id: PacketId,
    pub created: SimTime,
    /// Last transmitter.
    pub l2src: VehicleId,
    /// Originator.
    pub l3src: VehicleId,
    pub destination: Destination,
    pub payload: Payload,
}

impl Packet {
    /// Copy of this packet as retransmitted by `relay`.
    pub fn relayed_by(&self, relay: VehicleId, destination: Destination) -> Packet {
        Packet { l2src: relay, destination, ..self.clone() }
    }

    /// One `packetTrace` record; newlines in the content are escaped.
    pub fn trace_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.created,
            self.l2src,
            self.l3src,
            self.destination,
            self.payload.kind,
            self.payload.content.replace('\n', "\\n")
        )
    }
}

// ── PacketIdGenerator ─────────────────────────────────────────────────────────

/// Run-wide packet id counter, starting at 0.
#[derive(Debug, Default)]
pub struct PacketIdGenerator {
    next: u64,
}

impl PacketIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_id(&mut self) -> PacketId {
        let id = PacketId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    #[inline]
    pub fn issued(&self) -> u64 {
        self.next
    }
}
