//! Unit tests for pr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{PacketId, VehicleId};

    #[test]
    fn ordering_and_conversion() {
        assert!(VehicleId(0) < VehicleId(1));
        assert_eq!(PacketId::from(3u64), PacketId(3));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(VehicleId(7).to_string(), "7");
    }
}

#[cfg(test)]
mod geo {
    use crate::geo::meters_per_cell;
    use crate::{CellCoord, DistanceMetric, GeoPoint};

    #[test]
    fn cell_floors_arcseconds() {
        // 1 arcsecond = 1/3600 degree
        let p = GeoPoint::new(-8.0 - 0.5 / 3600.0, 41.0 + 10.5 / 3600.0);
        assert_eq!(p.cell(), CellCoord::new(-28_801, 147_610));
    }

    #[test]
    fn cell_center_round_trips() {
        let c = CellCoord::new(-28_800, 147_600);
        assert_eq!(c.center().cell(), c);
    }

    #[test]
    fn haversine_one_degree_latitude() {
        let a = GeoPoint::new(-8.0, 41.0);
        let b = GeoPoint::new(-8.0, 42.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn planar_one_cell() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0 / 3600.0);
        let d = DistanceMetric::Planar.distance_m(a, b);
        assert!((d - meters_per_cell()).abs() < 1e-6);
        assert!((meters_per_cell() - 30.89).abs() < 0.01);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, SimTime};

    #[test]
    fn conversions() {
        assert_eq!(SimTime::from_secs(2), SimTime(2_000_000));
        assert_eq!(SimTime::from_millis(10), SimTime(10_000));
        assert_eq!(SimTime::from_secs_f64(1.5), SimTime(1_500_000));
        assert_eq!(SimTime::from_secs_f64(-3.0), SimTime::ZERO);
        assert_eq!(SimTime::from_secs(3).as_millis(), 3_000);
    }

    #[test]
    fn add_saturates() {
        assert_eq!(SimTime::MAX + SimTime::from_secs(1), SimTime::MAX);
        assert_eq!(SimTime::ZERO - SimTime::from_secs(1), SimTime::ZERO);
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut clock = SimClock::new(SimTime::from_secs(10));
        assert!(!clock.has_started());
        clock.advance_to(SimTime::from_secs(5));
        clock.advance_to(SimTime::from_secs(3));
        assert_eq!(clock.now(), SimTime::from_secs(5));
        assert!(!clock.is_stopped());
        clock.advance_to(SimTime::from_secs(10));
        assert!(clock.is_stopped());
    }

    #[test]
    fn collection_times_stop_before_horizon() {
        let cfg = SimConfig {
            stop_time_secs: 100.0,
            seed: 0,
            collection_start_secs: 10.0,
            collection_interval_secs: 30.0,
        };
        let times: Vec<u64> = cfg.collection_times().iter().map(|t| t.as_millis() / 1000).collect();
        assert_eq!(times, vec![10, 40, 70]);
    }

    #[test]
    fn zero_interval_disables_collection() {
        let cfg = SimConfig { collection_interval_secs: 0.0, ..SimConfig::default() };
        assert!(cfg.collection_times().is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn sub_microsecond_interval_collects_nothing() {
        let cfg = SimConfig { collection_interval_secs: 1e-7, ..SimConfig::default() };
        assert!(cfg.collection_times().is_empty());
        assert!(cfg.validate().is_err());
        let nan = SimConfig { collection_interval_secs: f64::NAN, ..SimConfig::default() };
        assert!(nan.collection_times().is_empty());
        assert!(nan.validate().is_err());
    }

    #[test]
    fn unrepresentable_times_are_rejected() {
        assert!(SimConfig::default().validate().is_ok());
        for cfg in [
            SimConfig { stop_time_secs: f64::INFINITY, ..SimConfig::default() },
            SimConfig { stop_time_secs: 0.0, ..SimConfig::default() },
            SimConfig { collection_start_secs: -1.0, ..SimConfig::default() },
            SimConfig { collection_start_secs: f64::NAN, ..SimConfig::default() },
            SimConfig { collection_interval_secs: -5.0, ..SimConfig::default() },
        ] {
            assert!(cfg.validate().is_err(), "{cfg:?}");
        }
    }
}

#[cfg(test)]
mod rng {
    use crate::{SimRng, VehicleId};

    #[test]
    fn vehicle_streams_are_reproducible() {
        let sim = SimRng::new(99);
        let a: u32 = sim.for_vehicle(VehicleId(4)).gen_range(0..1_000_000);
        let b: u32 = sim.for_vehicle(VehicleId(4)).gen_range(0..1_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn vehicle_streams_differ() {
        let sim = SimRng::new(99);
        let a: u64 = sim.for_vehicle(VehicleId(1)).gen_range(0..u64::MAX);
        let b: u64 = sim.for_vehicle(VehicleId(2)).gen_range(0..u64::MAX);
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod hooks {
    use crate::{Hook, HookSet, HookSink, MemorySink, NoopSink, PrError};

    #[test]
    fn names_parse_back() {
        for hook in Hook::ALL {
            assert_eq!(hook.name().parse::<Hook>().unwrap(), hook);
        }
    }

    #[test]
    fn unknown_name_is_rejected_once() {
        let err = HookSet::from_names(["packetTrace", "bogus"]).unwrap_err();
        assert!(matches!(err, PrError::UnknownHook(ref n) if n == "bogus"));
    }

    #[test]
    fn set_membership() {
        let set = HookSet::from_names(["beaconCounts", " packetTrace "]).unwrap();
        assert!(set.contains(Hook::BeaconCounts));
        assert!(set.contains(Hook::PacketTrace));
        assert!(!set.contains(Hook::DecisionMaps));
        assert_eq!(set.iter().count(), 2);
        assert_eq!(HookSet::all().iter().count(), Hook::ALL.len());
    }

    #[test]
    fn memory_sink_writes_header_then_records() {
        let mut sink = MemorySink::new(HookSet::from_names(["activeVehicleCount"]).unwrap());
        sink.write_to_hook(Hook::ActiveVehicleCount, "1.000\t3");
        sink.write_to_hook(Hook::PacketTrace, "ignored");
        assert_eq!(sink.contents(Hook::ActiveVehicleCount), "time\tactive_vehicles\n1.000\t3\n");
        assert_eq!(sink.records(Hook::ActiveVehicleCount), vec!["1.000\t3"]);
        assert_eq!(sink.contents(Hook::PacketTrace), "");
    }

    #[test]
    fn noop_sink_is_disabled() {
        let mut sink = NoopSink;
        assert!(!sink.is_enabled(Hook::PacketTrace));
        sink.write_to_hook(Hook::PacketTrace, "x");
    }
}
