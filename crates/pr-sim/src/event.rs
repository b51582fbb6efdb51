//! Simulation events.

use pr_core::{SimTime, VehicleId};
use pr_decision::Ticket;
use pr_network::Packet;
use pr_schedule::EventQueue;

/// Everything that can happen at an instant.
///
/// Events that act on a vehicle carry what they expect to find (trip start,
/// decision ticket, parking instant); when the vehicle has moved on the
/// event is a logged no-op.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Apply mobility batch `i`.
    MobilityUpdate(usize),
    /// Periodic beacon of a moving vehicle on the trip that began at `trip`.
    Beacon { vehicle: VehicleId, trip: SimTime },
    Trigger { vehicle: VehicleId, ticket: Ticket },
    Decide { vehicle: VehicleId, ticket: Ticket },
    /// `to` hears `packet`.
    Deliver { packet: Packet, to: VehicleId },
    /// A relay that polled its relay neighbours answers `requester` with
    /// its own map plus theirs.
    DeferredReply { relay: VehicleId, requester: VehicleId },
    /// End of the parking stint that began at `parked_at`.
    ParkingExpired { vehicle: VehicleId, parked_at: SimTime },
    CollectStats,
}

impl Event {
    pub fn describe(&self) -> String {
        match self {
            Event::MobilityUpdate(i) => format!("mobility batch {i}"),
            Event::Beacon { vehicle, .. } => format!("beacon vehicle {vehicle}"),
            Event::Trigger { vehicle, .. } => format!("trigger decision vehicle {vehicle}"),
            Event::Decide { vehicle, .. } => format!("decide vehicle {vehicle}"),
            Event::Deliver { packet, to } => {
                format!("vehicle {to} receives packet {} from {}", packet.id, packet.l2src)
            }
            Event::DeferredReply { relay, requester } => {
                format!("deferred coverage map reply src {relay} dst {requester}")
            }
            Event::ParkingExpired { vehicle, .. } => format!("parking expires vehicle {vehicle}"),
            Event::CollectStats => "collect statistics".to_string(),
        }
    }

    /// Queue this event at `at`, described by [`describe`](Self::describe).
    pub fn schedule_at(self, queue: &mut EventQueue<Event>, at: SimTime) {
        let description = self.describe();
        queue.schedule(at, self, description);
    }

    /// Queue this event `delay` after the current instant.
    pub fn schedule_in(self, queue: &mut EventQueue<Event>, delay: SimTime) {
        let at = queue.now() + delay;
        self.schedule_at(queue, at);
    }
}
