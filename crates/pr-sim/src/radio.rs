//! Transmission, delivery and payload processing.
//!
//! Only parked cars and relays hear packets; moving vehicles transmit
//! beacons but never receive.  Every hop takes `message_delay`.
//!
//! Relays answer a depth-1 map request with their own map.  A depth-2
//! request makes the relay poll its relay neighbours first and answer
//! `map_poll_wait` later with its own map plus theirs.

use std::collections::BTreeSet;

use log::{debug, trace, warn};

use pr_core::{GeoPoint, Hook, HookSink, PacketId, SimTime, VehicleId};
use pr_fleet::Role;
use pr_network::{
    Beacon, CoverageMapRequest, CoverageMaps, Destination, Packet, Payload, PayloadContent, PayloadKind, receive,
};
use pr_schedule::EventQueue;
use pr_spatial::FeatureType;

use crate::sim::SimState;
use crate::{Event, SimResult};

/// Node types that receive transmissions.
const LISTENERS: [FeatureType; 2] = [FeatureType::ParkedCar, FeatureType::RoadsideUnit];

impl<K: HookSink> SimState<K> {
    /// Send a new packet from `from`; the network assigns its id.
    pub(crate) fn originate(
        &mut self,
        from: VehicleId,
        destination: Destination,
        payload: Payload,
        queue: &mut EventQueue<Event>,
    ) -> SimResult<PacketId> {
        let packet = Packet {
            id: self.packet_ids.next_id(),
            created: queue.now(),
            l2src: from,
            l3src: from,
            destination,
            payload,
        };
        let id = packet.id;
        self.transmit(packet, queue)?;
        Ok(id)
    }

    /// Put `packet` on the air from its `l2src`.
    ///
    /// Broadcast and geocast copies reach the listeners in range after one
    /// `message_delay`; every forwarding hop is a new transmission.  A unicast
    /// is routed in one step: it reaches its target after one `message_delay`
    /// per hop of the shortest path over listening nodes, and is dropped if
    /// that path is longer than `unicast_max_hops`.
    pub(crate) fn transmit(&mut self, packet: Packet, queue: &mut EventQueue<Event>) -> SimResult<()> {
        let sink = self.engine.sink_mut();
        if sink.is_enabled(Hook::PacketTrace) {
            sink.write_to_hook(Hook::PacketTrace, &packet.trace_row());
        }
        self.counters.packets_sent += 1;

        let origin = self.registry.get(packet.l2src)?.position;
        let delay = self.config.network.message_delay();

        if let Destination::Unicast(target) = packet.destination {
            match self.unicast_hops(packet.l2src, origin, target) {
                Some(hops) => {
                    let delay = (0..hops).fold(SimTime::ZERO, |acc, _| acc + delay);
                    Event::Deliver { packet, to: target }.schedule_in(queue, delay);
                }
                None => {
                    self.counters.unreachable_unicasts += 1;
                    debug!("packet {} from {} cannot reach {target}", packet.id, packet.l2src);
                }
            }
            return Ok(());
        }

        let net = &self.config.network;
        let hearers = self.registry.neighbors(origin, net.max_range_m, net.distance_metric, &LISTENERS);
        for n in hearers.into_iter().filter(|n| n.owner != packet.l2src) {
            Event::Deliver { packet: packet.clone(), to: n.owner }.schedule_in(queue, delay);
        }
        Ok(())
    }

    /// Radio hops from `from` to `target`, relaying only through listening
    /// nodes, if `target` is within `unicast_max_hops`.
    fn unicast_hops(&self, from: VehicleId, origin: GeoPoint, target: VehicleId) -> Option<u32> {
        let net = &self.config.network;
        let mut visited = BTreeSet::from([from]);
        let mut frontier = vec![origin];
        for hop in 1..=net.unicast_max_hops {
            let mut next = Vec::new();
            for &center in &frontier {
                for n in self.registry.neighbors(center, net.max_range_m, net.distance_metric, &LISTENERS) {
                    if n.owner == target {
                        return Some(hop);
                    }
                    if visited.insert(n.owner) {
                        next.push(n.position);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        None
    }

    /// `to` hears `packet`.
    pub(crate) fn deliver(&mut self, packet: Packet, to: VehicleId, queue: &mut EventQueue<Event>) -> SimResult<()> {
        let rec = self.registry.get_mut(to)?;
        if !rec.role.is_fixed() {
            trace!("packet {} dropped: vehicle {to} is {}", packet.id, rec.role);
            return Ok(());
        }
        let position = rec.position;
        let reception = receive(&packet, to, position, &mut rec.seen_packets);
        if let Some(forward) = reception.forward {
            self.transmit(forward, queue)?;
        }
        if reception.process {
            self.counters.deliveries += 1;
            self.process(to, &packet, queue)?;
        }
        Ok(())
    }

    fn process(&mut self, node: VehicleId, packet: &Packet, queue: &mut EventQueue<Event>) -> SimResult<()> {
        match packet.payload.kind {
            PayloadKind::Beacon => {
                let beacon = match packet.payload.decode::<Beacon>() {
                    Ok(b) => b,
                    Err(e) => {
                        warn!("vehicle {node} dropped beacon {}: {e}", packet.id);
                        return Ok(());
                    }
                };
                let metric = self.config.network.distance_metric;
                let rec = self.registry.get_mut(node)?;
                let strength = self.signal.strength(metric.distance_m(rec.position, beacon.position), true);
                rec.record_signal(beacon.position, strength);
                self.counters.beacons_received += 1;
            }
            PayloadKind::CoverageMapRequest => {
                if self.registry.get(node)?.role != Role::RoadsideUnit {
                    return Ok(());
                }
                let request = match packet.payload.decode::<CoverageMapRequest>() {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("relay {node} dropped request {}: {e}", packet.id);
                        return Ok(());
                    }
                };
                match request.depth {
                    1 => self.reply_with_maps(node, packet.l3src, queue)?,
                    2 => {
                        let poll = CoverageMapRequest { depth: 1 }.to_payload()?;
                        self.originate(node, Destination::Broadcast { hop_limit: 1 }, poll, queue)?;
                        self.counters.map_polls += 1;
                        Event::DeferredReply { relay: node, requester: packet.l3src }
                            .schedule_in(queue, self.config.network.map_poll_wait());
                    }
                    depth => warn!("relay {node} ignores request {} with depth {depth}", packet.id),
                }
            }
            PayloadKind::CoverageMaps => {
                if self.registry.get(node)?.role == Role::RoadsideUnit {
                    match packet.payload.decode::<CoverageMaps>() {
                        Ok(reply) => {
                            let now = queue.now();
                            self.registry.get_mut(node)?.remember_maps(reply, packet.l3src, now);
                        }
                        Err(e) => warn!("relay {node} dropped maps {}: {e}", packet.id),
                    }
                } else if self.engine.is_requesting(node) {
                    self.registry.push_payload(node, packet.payload.clone())?;
                }
            }
            PayloadKind::DecisionRecord => {}
        }
        Ok(())
    }

    /// Unicast `relay`'s own map to `requester`.
    fn reply_with_maps(&mut self, relay: VehicleId, requester: VehicleId, queue: &mut EventQueue<Event>) -> SimResult<()> {
        let Some(own) = self.registry.get(relay)?.self_coverage.clone() else {
            return Ok(());
        };
        let reply = CoverageMaps::single(relay, own).to_payload()?;
        self.originate(relay, Destination::Unicast(requester), reply, queue)?;
        self.counters.map_replies += 1;
        Ok(())
    }

    /// Answer a depth-2 request: the relay's own map plus the maps its relay
    /// neighbours sent since the poll.
    pub(crate) fn on_deferred_reply(
        &mut self,
        relay: VehicleId,
        requester: VehicleId,
        queue: &mut EventQueue<Event>,
    ) -> SimResult<()> {
        let rec = self.registry.get(relay)?;
        let (Role::RoadsideUnit, Some(own)) = (rec.role, rec.self_coverage.as_ref()) else {
            self.stale("deferred reply", relay);
            return Ok(());
        };
        let since = queue.now() - self.config.network.neighbor_map_max_age();
        let mut reply = CoverageMaps::single(relay, own.clone());
        reply.maps.extend(rec.fresh_neighbor_maps(since));
        trace!("relay {relay} answers {requester} with {} maps", reply.maps.len());

        let payload = reply.to_payload()?;
        self.originate(relay, Destination::Unicast(requester), payload, queue)?;
        self.counters.map_replies += 1;
        Ok(())
    }
}
