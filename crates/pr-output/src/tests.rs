//! Integration tests for pr-output.

// ── Fixtures ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fixtures {
    use pr_core::{GeoPoint, SimTime, VehicleId};
    use pr_schedule::{FcdVehicle, MobilityBatch, ParkingLifetime};
    use pr_sim::{FixedRoadsideUnit, ScenarioConfig};

    use crate::row::{CollectionRow, DecisionRow};

    pub fn tmp() -> tempfile::TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    pub fn decision_row(vehicle: u32, d_new: u64) -> DecisionRow {
        DecisionRow {
            time_secs: 8.0,
            vehicle,
            d_new,
            d_boost: 1,
            d_sat: 2,
            d_score: d_new as f64 - 1.0,
            kappa: 1.0,
            lambda: 1.0,
            mu: 1.0,
            converted: d_new > 1,
        }
    }

    pub fn collection_row(secs: f64) -> CollectionRow {
        CollectionRow { time_secs: secs, active_vehicles: 4, parked: 2, relays: 1 }
    }

    fn at(x: f64) -> GeoPoint {
        GeoPoint::new(-8.61 + x * 0.0001, 41.15)
    }

    /// A relay, a car that parks at t=2 about 100 m from it, and a vehicle
    /// only the parked car can hear.  The car converts at t=8.
    pub fn scenario() -> (ScenarioConfig, Vec<MobilityBatch>) {
        let mut config = ScenarioConfig::default();
        config.sim.stop_time_secs = 30.0;
        config.sim.collection_interval_secs = 10.0;
        config.decision.trigger_delay_secs = 5.0;
        config.parking.lifetime = ParkingLifetime::Fixed { secs: 100.0 };
        let relay = at(0.0);
        config.roadside_units = vec![FixedRoadsideUnit { id: 100, lon: relay.lon, lat: relay.lat }];

        let batches = (0..=20u64)
            .map(|t| {
                let mut vehicles = vec![FcdVehicle { id: VehicleId(2), position: at(24.0), speed: 8.0 }];
                if t <= 1 {
                    vehicles.push(FcdVehicle { id: VehicleId(1), position: at(12.0), speed: 8.0 });
                }
                MobilityBatch::new(SimTime::from_secs(t), vehicles)
            })
            .collect();
        (config, batches)
    }
}

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::fixtures::{collection_row, decision_row, tmp};
    use crate::csv::{COLLECTION_HEADER, CsvWriter, DECISION_HEADER};
    use crate::writer::OutputWriter;

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("decisions.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, DECISION_HEADER);

        let mut rdr = csv::Reader::from_path(dir.path().join("collections.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, COLLECTION_HEADER);
    }

    #[test]
    fn csv_decision_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_decisions(&[decision_row(7, 4), decision_row(9, 0)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("decisions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "8.000");
        assert_eq!(&rows[0][1], "7");
        assert_eq!(&rows[0][5], "3"); // dScore
        assert_eq!(&rows[0][9], "1"); // converted
        assert_eq!(&rows[1][5], "-1");
        assert_eq!(&rows[1][9], "0");
    }

    #[test]
    fn csv_collection_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_collection(&collection_row(60.0)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("collections.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["60.000", "4", "2", "1"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_decisions(&[]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("nope")).is_err());
    }
}

// ── Hook files ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod hook_files {
    use pr_core::{Hook, HookSet, HookSink};

    use super::fixtures::tmp;
    use crate::FileHookSink;

    fn hooks(list: &[Hook]) -> HookSet {
        list.iter().copied().collect()
    }

    #[test]
    fn one_file_per_enabled_hook_with_header() {
        let dir = tmp();
        let folder = dir.path().join("stats");
        let sink = FileHookSink::create(&folder, hooks(&[Hook::ActiveVehicleCount, Hook::ObstructionMask]))
            .unwrap();
        assert_eq!(sink.path(Hook::ActiveVehicleCount), folder.join("activeVehicleCount.log"));
        sink.finish().unwrap();

        let text = std::fs::read_to_string(folder.join("activeVehicleCount.log")).unwrap();
        assert_eq!(text, "time\tactive_vehicles\n");
        let mask = std::fs::read_to_string(folder.join("obstructionMask.log")).unwrap();
        assert!(mask.is_empty());
        assert!(!folder.join("packetTrace.log").exists());
    }

    #[test]
    fn records_are_appended_in_order() {
        let dir = tmp();
        let mut sink = FileHookSink::create(dir.path(), hooks(&[Hook::BeaconCounts])).unwrap();
        assert!(sink.is_enabled(Hook::BeaconCounts));
        assert!(!sink.is_enabled(Hook::PacketTrace));
        sink.write_to_hook(Hook::BeaconCounts, "0.000\t0\t0");
        sink.write_to_hook(Hook::BeaconCounts, "60.000\t12\t30");
        sink.write_to_hook(Hook::PacketTrace, "ignored");
        let path = sink.path(Hook::BeaconCounts);
        sink.finish().unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "time\tsent\treceived\n0.000\t0\t0\n60.000\t12\t30\n");
    }

    #[test]
    fn no_hooks_means_no_files() {
        let dir = tmp();
        let sink = FileHookSink::create(dir.path(), HookSet::empty()).unwrap();
        sink.finish().unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use pr_core::{Hook, HookSet};
    use pr_sim::SimBuilder;

    use super::fixtures::{scenario, tmp};
    use crate::{CsvWriter, FileHookSink, SimOutputObserver};

    #[test]
    fn integration_csv() {
        let (config, batches) = scenario();
        let dir = tmp();
        let hooks: HookSet = [Hook::DecisionCellCoverageEffects, Hook::ActiveRoadsideUnitCount]
            .into_iter()
            .collect();
        let sink = FileHookSink::create(dir.path().join("stats"), hooks).unwrap();
        let mut sim = SimBuilder::new(config, batches).sink(sink).build().unwrap();

        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");
        assert_eq!(obs.decisions_written(), 1);
        sim.into_sink().finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("decisions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][9], "1");

        // Collections at 0, 10 and 20.
        let mut rdr = csv::Reader::from_path(dir.path().join("collections.csv")).unwrap();
        let relays: Vec<String> = rdr.records().map(|r| r.unwrap()[3].to_string()).collect();
        assert_eq!(relays, ["1", "2", "2"]);

        let effects =
            std::fs::read_to_string(dir.path().join("stats/decisionCellCoverageEffects.log")).unwrap();
        assert_eq!(effects.lines().count(), 2);
        assert!(effects.lines().nth(1).unwrap().starts_with("8.000\t1\t4\t"));
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::fixtures::{collection_row, decision_row, tmp};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_decision_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_decisions(&[decision_row(1, 3), decision_row(2, 0), decision_row(3, 5)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM decisions", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
        let converted: i64 = conn
            .query_row("SELECT SUM(converted) FROM decisions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(converted, 2);
    }

    #[test]
    fn sqlite_collection() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_collection(&collection_row(120.0)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (time, parked, relays): (f64, i64, i64) = conn
            .query_row("SELECT time, parked, relays FROM collections", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(time, 120.0);
        assert_eq!(parked, 2);
        assert_eq!(relays, 1);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::fixtures::{decision_row, tmp};
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn parquet_decisions_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_decisions(&[decision_row(1, 3), decision_row(2, 0)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("decisions.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let total_rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);
        assert_eq!(*schema.field_with_name("converted").unwrap().data_type(), DataType::Boolean);
        assert_eq!(*schema.field_with_name("d_score").unwrap().data_type(), DataType::Float64);
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_decisions(&[decision_row(1, 3)]).unwrap();
        }
        let file = std::fs::File::open(dir.path().join("decisions.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
