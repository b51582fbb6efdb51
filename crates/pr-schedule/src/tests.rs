//! Unit tests for pr-schedule.

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_queue {
    use pr_core::SimTime;

    use crate::{EventHandler, EventQueue, ScheduledEvent};

    /// Records execution order and the clock seen by each event.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<(SimTime, u32)>,
        /// When an event with this label runs, schedule `label + 100` at the
        /// same instant.
        chain_on: Option<u32>,
    }

    impl EventHandler<u32> for Recorder {
        fn handle(&mut self, ev: ScheduledEvent<u32>, queue: &mut EventQueue<u32>) {
            assert_eq!(queue.now(), ev.time);
            self.seen.push((ev.time, ev.event));
            if self.chain_on == Some(ev.event) {
                queue.schedule(queue.now(), ev.event + 100, "chained");
            }
        }
    }

    fn secs(s: u64) -> SimTime {
        SimTime::from_secs(s)
    }

    #[test]
    fn runs_in_time_order() {
        let mut q = EventQueue::new(secs(100));
        q.schedule(secs(5), 2, "b");
        q.schedule(secs(1), 1, "a");
        q.schedule(secs(9), 3, "c");
        let mut rec = Recorder::default();
        assert_eq!(q.run(&mut rec), 3);
        assert_eq!(rec.seen, vec![(secs(1), 1), (secs(5), 2), (secs(9), 3)]);
        assert!(q.is_empty());
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut q = EventQueue::new(secs(100));
        for label in [10, 11, 12, 13] {
            q.schedule(secs(3), label, "tie");
        }
        let mut rec = Recorder::default();
        q.run(&mut rec);
        let labels: Vec<u32> = rec.seen.iter().map(|(_, l)| *l).collect();
        assert_eq!(labels, vec![10, 11, 12, 13]);
    }

    #[test]
    fn same_instant_event_scheduled_during_run_goes_last() {
        let mut q = EventQueue::new(secs(100));
        q.schedule(secs(2), 1, "first");
        q.schedule(secs(2), 2, "second");
        let mut rec = Recorder { chain_on: Some(1), ..Recorder::default() };
        q.run(&mut rec);
        let labels: Vec<u32> = rec.seen.iter().map(|(_, l)| *l).collect();
        assert_eq!(labels, vec![1, 2, 101]);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut q = EventQueue::new(secs(100));
        for (i, t) in [7u64, 3, 3, 9, 0, 7].into_iter().enumerate() {
            q.schedule(secs(t), i as u32, "e");
        }
        let mut rec = Recorder::default();
        q.run(&mut rec);
        assert!(rec.seen.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn stops_at_stop_time() {
        let mut q = EventQueue::new(secs(10));
        q.schedule(secs(9), 1, "in");
        q.schedule(secs(10), 2, "at stop");
        q.schedule(secs(50), 3, "after");
        let mut rec = Recorder::default();
        assert_eq!(q.run(&mut rec), 1);
        assert_eq!(rec.seen, vec![(secs(9), 1)]);
        assert_eq!(q.len(), 2);
        assert_eq!(q.now(), secs(10));
        assert!(q.clock().is_stopped());
    }

    #[test]
    fn schedule_does_not_move_clock() {
        let mut q: EventQueue<u32> = EventQueue::new(secs(10));
        q.schedule(secs(4), 1, "x");
        assert_eq!(q.now(), SimTime::ZERO);
        assert_eq!(q.next_time(), Some(secs(4)));
    }

    #[test]
    fn past_events_run_now() {
        let mut q = EventQueue::new(secs(100));
        q.schedule(secs(5), 1, "x");
        let first = q.pop_next().unwrap();
        assert_eq!(first.time, secs(5));
        q.schedule(secs(1), 2, "late");
        let late = q.pop_next().unwrap();
        assert_eq!(late.time, secs(5));
        assert_eq!(q.now(), secs(5));
    }

    #[test]
    fn schedule_in_is_relative() {
        let mut q = EventQueue::new(secs(100));
        q.schedule(secs(2), 0, "x");
        q.pop_next();
        q.schedule_in(SimTime::from_millis(10), 1, "y");
        assert_eq!(q.next_time(), Some(SimTime::from_millis(2_010)));
        assert_eq!(q.executed(), 1);
    }
}

// ── Mobility reconciliation ───────────────────────────────────────────────────

#[cfg(test)]
mod mobility {
    use std::collections::BTreeSet;

    use pr_core::{CellCoord, GeoPoint, SimTime, VehicleId};

    use crate::{FcdVehicle, MobilityBatch, city_bounds, reconcile};

    fn obs(id: u32, lon: f64, lat: f64) -> FcdVehicle {
        FcdVehicle { id: VehicleId(id), position: GeoPoint::new(lon, lat), speed: 0.0 }
    }

    #[test]
    fn splits_created_updated_missing() {
        let active: BTreeSet<VehicleId> = [1, 2, 3].into_iter().map(VehicleId).collect();
        let batch = MobilityBatch::new(
            SimTime::from_secs(1),
            vec![obs(4, 0.0, 0.0), obs(2, 0.0, 0.0), obs(1, 0.0, 0.0)],
        );
        let diff = reconcile(&active, &batch);
        let ids = |v: &[FcdVehicle]| v.iter().map(|f| f.id.0).collect::<Vec<_>>();
        assert_eq!(ids(&diff.created), vec![4]);
        assert_eq!(ids(&diff.updated), vec![1, 2]);
        assert_eq!(diff.missing, vec![VehicleId(3)]);
    }

    #[test]
    fn empty_batch_reports_all_missing() {
        let active: BTreeSet<VehicleId> = [7].into_iter().map(VehicleId).collect();
        let diff = reconcile(&active, &MobilityBatch::default());
        assert!(diff.created.is_empty() && diff.updated.is_empty());
        assert_eq!(diff.missing, vec![VehicleId(7)]);
    }

    #[test]
    fn duplicate_observation_keeps_last() {
        let batch = MobilityBatch::new(SimTime::ZERO, vec![obs(1, 0.0, 0.0), obs(1, 1.0, 1.0)]);
        let diff = reconcile(&BTreeSet::new(), &batch);
        assert_eq!(diff.created.len(), 1);
        assert_eq!(diff.created[0].position, GeoPoint::new(1.0, 1.0));
    }

    #[test]
    fn bounds_cover_every_observation() {
        let cell = 1.0 / 3600.0;
        let batches = vec![
            MobilityBatch::new(SimTime::ZERO, vec![obs(1, 10.5 * cell, 20.5 * cell)]),
            MobilityBatch::new(SimTime::from_secs(1), vec![obs(2, 12.5 * cell, 17.5 * cell)]),
        ];
        let (tl, w, h) = city_bounds(&batches).unwrap();
        assert_eq!(tl, CellCoord::new(10, 20));
        assert_eq!((w, h), (3, 4));
        assert!(city_bounds(&[]).is_none());
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use pr_core::{SimTime, VehicleId};

    use crate::{ScheduleError, load_mobility_reader};

    const TSV: &str = "time\tid\tx\ty\tspeed\n\
                       1.0\t2\t-8.61\t41.15\t3.0\n\
                       0.0\t1\t-8.60\t41.14\t0.0\n\
                       1.0\t1\t-8.60\t41.15\t1.5\n\
                       9.0\t1\t-8.60\t41.16\t1.5\n";

    #[test]
    fn groups_rows_by_time() {
        let batches = load_mobility_reader(Cursor::new(TSV), b'\t', SimTime::from_secs(5)).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].time, SimTime::ZERO);
        assert_eq!(batches[1].time, SimTime::from_secs(1));
        let ids: Vec<VehicleId> = batches[1].vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![VehicleId(2), VehicleId(1)]);
        assert_eq!(batches[1].vehicles[1].speed, 1.5);
    }

    #[test]
    fn comma_separated() {
        let csv = "time,id,x,y,speed\n0.5,3,1.0,2.0,0.0\n";
        let batches = load_mobility_reader(Cursor::new(csv), b',', SimTime::from_secs(5)).unwrap();
        assert_eq!(batches[0].time, SimTime::from_millis(500));
        assert_eq!(batches[0].vehicles[0].position.lat, 2.0);
    }

    #[test]
    fn bad_rows_are_parse_errors() {
        let csv = "time,id,x,y,speed\n0.5,abc,1.0,2.0,0.0\n";
        assert!(matches!(
            load_mobility_reader(Cursor::new(csv), b',', SimTime::from_secs(5)),
            Err(ScheduleError::Parse(_))
        ));
        let negative = "time,id,x,y,speed\n-1,1,1.0,2.0,0.0\n";
        assert!(load_mobility_reader(Cursor::new(negative), b',', SimTime::from_secs(5)).is_err());
    }
}

// ── Parking lifetimes ─────────────────────────────────────────────────────────

#[cfg(test)]
mod lifetime {
    use pr_core::{SimRng, SimTime, VehicleId};

    use crate::ParkingLifetime;

    #[test]
    fn fixed_is_constant() {
        let model = ParkingLifetime::Fixed { secs: 90.0 };
        let mut rng = SimRng::new(1).for_vehicle(VehicleId(1));
        assert!(model.validate().is_ok());
        assert_eq!(model.sample(&mut rng).unwrap(), SimTime::from_secs(90));
    }

    #[test]
    fn gamma_is_positive_and_reproducible() {
        let model = ParkingLifetime::Gamma { shape: 2.0, scale_secs: 600.0 };
        let sim = SimRng::new(5);
        let a = model.sample(&mut sim.for_vehicle(VehicleId(3))).unwrap();
        let b = model.sample(&mut sim.for_vehicle(VehicleId(3))).unwrap();
        assert_eq!(a, b);
        assert!(a > SimTime::ZERO);
    }

    #[test]
    fn invalid_models_are_rejected() {
        assert!(ParkingLifetime::Fixed { secs: 0.0 }.validate().is_err());
        assert!(ParkingLifetime::Gamma { shape: -1.0, scale_secs: 1.0 }.validate().is_err());
    }
}
