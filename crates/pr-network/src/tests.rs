//! Unit tests for pr-network.

#[cfg(test)]
mod helpers {
    use pr_core::{PacketId, SimTime, VehicleId};

    use crate::{Destination, Packet, Payload, PayloadKind};

    pub fn packet(id: u64, src: u32, destination: Destination) -> Packet {
        Packet {
            id: PacketId(id),
            created: SimTime::from_secs(1),
            l2src: VehicleId(src),
            l3src: VehicleId(src),
            destination,
            payload: Payload::new(PayloadKind::CoverageMapRequest, "1"),
        }
    }
}

// ── Addressing ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod addressing {
    use pr_core::geo::DEGREES_PER_METER;
    use pr_core::{GeoPoint, PacketId};

    use crate::{Circle, Destination, PacketIdGenerator};

    #[test]
    fn ids_start_at_zero_and_increase() {
        let mut ids = PacketIdGenerator::new();
        assert_eq!(ids.next_id(), PacketId(0));
        assert_eq!(ids.next_id(), PacketId(1));
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn circle_uses_planar_arcsecond_distance() {
        let center = GeoPoint::new(-8.61, 41.15);
        let circle = Circle::new(center, 155.0);
        let inside = GeoPoint::new(center.lon + 150.0 * DEGREES_PER_METER, center.lat);
        let outside = GeoPoint::new(center.lon, center.lat + 160.0 * DEGREES_PER_METER);
        assert!(circle.contains(center));
        assert!(circle.contains(inside));
        assert!(!circle.contains(outside));
    }

    #[test]
    fn destination_display() {
        assert_eq!(Destination::Unicast(pr_core::VehicleId(4)).to_string(), "unicast(4)");
        assert_eq!(Destination::Broadcast { hop_limit: 2 }.to_string(), "broadcast(2)");
    }
}

// ── Payload codecs ────────────────────────────────────────────────────────────

#[cfg(test)]
mod payload {
    use pr_core::{CellCoord, GeoPoint, VehicleId};
    use pr_grid::CoverageMap;
    use pr_spatial::FeatureType;

    use crate::{
        Beacon, CoverageMapRequest, CoverageMaps, NetworkError, Payload, PayloadContent, PayloadKind,
        SelfCoverageMap,
    };

    #[test]
    fn beacon_round_trip() {
        let beacon = Beacon {
            position: GeoPoint::new(-8.612345678, 41.1498765),
            source: VehicleId(12),
            kind: FeatureType::Vehicle,
        };
        let payload = beacon.to_payload().unwrap();
        assert_eq!(payload.kind, PayloadKind::Beacon);
        assert!(payload.content.ends_with(";12;2222"));
        assert_eq!(payload.decode::<Beacon>().unwrap(), beacon);
    }

    #[test]
    fn malformed_beacon() {
        let payload = Payload::new(PayloadKind::Beacon, "1.0;2.0;x;2222");
        assert!(matches!(payload.decode::<Beacon>(), Err(NetworkError::Decode { .. })));
        let short = Payload::new(PayloadKind::Beacon, "1.0;2.0");
        assert!(short.decode::<Beacon>().is_err());
    }

    #[test]
    fn request_depth() {
        let payload = CoverageMapRequest { depth: 2 }.to_payload().unwrap();
        assert_eq!(payload.content, "2");
        assert_eq!(payload.decode::<CoverageMapRequest>().unwrap().depth, 2);
    }

    #[test]
    fn coverage_maps_tag_each_grid_with_its_owner() {
        let mut first = CoverageMap::new(2, 2, 0, CellCoord::new(5, 9)).unwrap();
        first.set(1, 0, 4).unwrap();
        let second = CoverageMap::new(1, 1, 3, CellCoord::new(-2, 7)).unwrap();
        let mut maps = CoverageMaps::single(VehicleId(100), first);
        maps.maps.push(SelfCoverageMap { owner: VehicleId(101), map: second });

        let payload = maps.to_payload().unwrap();
        assert_eq!(payload.kind, PayloadKind::CoverageMaps);
        assert_eq!(payload.content, "id100\ntlc5;9\n00\n40\nid101\ntlc-2;7\n3\n");
        assert_eq!(payload.decode::<CoverageMaps>().unwrap(), maps);
    }

    #[test]
    fn empty_coverage_maps_cannot_be_sent() {
        let err = CoverageMaps::default().to_payload().unwrap_err();
        assert!(matches!(err, NetworkError::EmptyPayload(PayloadKind::CoverageMaps)));
    }

    #[test]
    fn kind_is_checked_before_content() {
        let payload = Payload::new(PayloadKind::Beacon, "id1\ntlc5;9\n00\n");
        assert!(matches!(
            payload.decode::<CoverageMaps>(),
            Err(NetworkError::WrongKind { expected: PayloadKind::CoverageMaps, found: PayloadKind::Beacon })
        ));
    }

    #[test]
    fn malformed_coverage_maps() {
        let bad_cell = Payload::new(PayloadKind::CoverageMaps, "id1\ntlc5;9\n0x\n");
        assert!(matches!(bad_cell.decode::<CoverageMaps>(), Err(NetworkError::Grid(_))));
        let no_owner = Payload::new(PayloadKind::CoverageMaps, "tlc5;9\n00\n");
        assert!(matches!(no_owner.decode::<CoverageMaps>(), Err(NetworkError::Decode { .. })));
        let bad_owner = Payload::new(PayloadKind::CoverageMaps, "idx\ntlc5;9\n00\n");
        assert!(matches!(bad_owner.decode::<CoverageMaps>(), Err(NetworkError::Decode { .. })));
    }
}

// ── Reception rules ───────────────────────────────────────────────────────────

#[cfg(test)]
mod reception {
    use std::collections::BTreeSet;

    use pr_core::geo::DEGREES_PER_METER;
    use pr_core::{GeoPoint, VehicleId};

    use super::helpers::packet;
    use crate::{Circle, Destination, Reception, receive};

    const HERE: GeoPoint = GeoPoint { lon: -8.61, lat: 41.15 };

    #[test]
    fn own_packets_are_ignored() {
        let mut seen = BTreeSet::new();
        let p = packet(0, 3, Destination::Broadcast { hop_limit: 2 });
        assert_eq!(receive(&p, VehicleId(3), HERE, &mut seen), Reception::IGNORE);
        assert!(seen.is_empty());
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut seen = BTreeSet::new();
        let p = packet(7, 1, Destination::Broadcast { hop_limit: 1 });
        assert!(receive(&p, VehicleId(2), HERE, &mut seen).process);
        assert_eq!(receive(&p, VehicleId(2), HERE, &mut seen), Reception::IGNORE);
    }

    #[test]
    fn broadcast_decrements_hops() {
        let mut seen = BTreeSet::new();
        let p = packet(0, 1, Destination::Broadcast { hop_limit: 2 });
        let r = receive(&p, VehicleId(2), HERE, &mut seen);
        assert!(r.process);
        let fwd = r.forward.unwrap();
        assert_eq!(fwd.destination, Destination::Broadcast { hop_limit: 1 });
        assert_eq!(fwd.l2src, VehicleId(2));
        assert_eq!(fwd.l3src, VehicleId(1));
        assert_eq!(fwd.id, p.id);
    }

    #[test]
    fn last_hop_is_not_forwarded() {
        let mut seen = BTreeSet::new();
        let p = packet(0, 1, Destination::Broadcast { hop_limit: 1 });
        assert!(receive(&p, VehicleId(2), HERE, &mut seen).forward.is_none());
    }

    #[test]
    fn unicast_only_processed_by_target() {
        let mut seen = BTreeSet::new();
        let p = packet(0, 1, Destination::Unicast(VehicleId(5)));
        assert!(!receive(&p, VehicleId(2), HERE, &mut seen).process);
        let mut seen = BTreeSet::new();
        let r = receive(&p, VehicleId(5), HERE, &mut seen);
        assert!(r.process);
        assert!(r.forward.is_none());
    }

    #[test]
    fn geocast_outside_area_is_dropped() {
        let area = Circle::new(HERE, 155.0);
        let p = packet(0, 1, Destination::Geocast(area));
        let far = GeoPoint::new(HERE.lon, HERE.lat + 500.0 * DEGREES_PER_METER);
        let mut seen = BTreeSet::new();
        assert_eq!(receive(&p, VehicleId(2), far, &mut seen), Reception::IGNORE);
    }

    #[test]
    fn geocast_inside_area_is_processed_and_forwarded() {
        let area = Circle::new(HERE, 155.0);
        let p = packet(4, 1, Destination::Geocast(area));
        let near = GeoPoint::new(HERE.lon + 100.0 * DEGREES_PER_METER, HERE.lat);
        let mut seen = BTreeSet::new();
        let r = receive(&p, VehicleId(2), near, &mut seen);
        assert!(r.process);
        let fwd = r.forward.unwrap();
        assert_eq!(fwd.destination, Destination::Geocast(area));
        assert_eq!((fwd.id, fwd.l2src, fwd.l3src), (p.id, VehicleId(2), VehicleId(1)));
        assert!(seen.contains(&p.id));
        // The forwarded copy comes back: already seen.
        assert_eq!(receive(&fwd, VehicleId(2), near, &mut seen), Reception::IGNORE);
    }
}

// ── Signal model & config ─────────────────────────────────────────────────────

#[cfg(test)]
mod signal {
    use crate::{NetworkConfig, SignalModel, SteppedSignalModel};

    #[test]
    fn porto_steps() {
        let m = SteppedSignalModel::porto();
        assert_eq!(m.strength(0.0, true), 5);
        assert_eq!(m.strength(70.0, true), 4);
        assert_eq!(m.strength(134.9, true), 3);
        assert_eq!(m.strength(154.0, true), 2);
        assert_eq!(m.strength(155.0, true), 0);
        assert_eq!(m.strength(60.0, false), 4);
        assert_eq!(m.strength(130.0, false), 0);
    }

    #[test]
    fn config_defaults_and_validation() {
        let cfg = NetworkConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.message_delay().as_millis(), 10);
        let even = NetworkConfig { self_coverage_map_size: 12, ..NetworkConfig::default() };
        assert!(even.validate().is_err());
        let zero_range = NetworkConfig { max_range_m: 0.0, ..NetworkConfig::default() };
        assert!(zero_range.validate().is_err());
    }
}
