//! Mobility feed loader.
//!
//! # Format
//!
//! One row per vehicle observation, with a header row.  Comma- and
//! tab-separated variants are supported.
//!
//! ```text
//! time	id	x	y	speed
//! 0.00	1	-8.6102	41.1496	0.00
//! 0.00	2	-8.6110	41.1490	3.20
//! 1.00	1	-8.6101	41.1496	1.10
//! ```
//!
//! `x` is longitude and `y` latitude in degrees, `time` in seconds.  Rows
//! are grouped into one [`MobilityBatch`] per distinct time; batches come out
//! in time order, and vehicles inside a batch keep file order.  Rows later
//! than the stop time are skipped.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use pr_core::{GeoPoint, SimTime, VehicleId};

use crate::{FcdVehicle, MobilityBatch, ScheduleError, ScheduleResult};

// ── Record ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MobilityRecord {
    time:  f64,
    id:    u32,
    x:     f64,
    y:     f64,
    speed: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a comma-separated feed from `path`.
pub fn load_mobility_csv(path: &Path, stop_time: SimTime) -> ScheduleResult<Vec<MobilityBatch>> {
    let file = std::fs::File::open(path)?;
    let batches = load_mobility_reader(file, b',', stop_time)?;
    info!("loaded {} timesteps from {}", batches.len(), path.display());
    Ok(batches)
}

/// Load a tab-separated feed from `path`.
pub fn load_mobility_tsv(path: &Path, stop_time: SimTime) -> ScheduleResult<Vec<MobilityBatch>> {
    let file = std::fs::File::open(path)?;
    let batches = load_mobility_reader(file, b'\t', stop_time)?;
    info!("loaded {} timesteps from {}", batches.len(), path.display());
    Ok(batches)
}

/// Like [`load_mobility_csv`] but from any `Read` source and delimiter.
pub fn load_mobility_reader<R: Read>(
    reader: R,
    delimiter: u8,
    stop_time: SimTime,
) -> ScheduleResult<Vec<MobilityBatch>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut by_time: BTreeMap<SimTime, Vec<FcdVehicle>> = BTreeMap::new();
    for (line, result) in csv_reader.deserialize::<MobilityRecord>().enumerate() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        if !row.time.is_finite() || row.time < 0.0 {
            return Err(ScheduleError::Parse(format!(
                "record {}: invalid time {}",
                line + 1,
                row.time
            )));
        }
        let time = SimTime::from_secs_f64(row.time);
        if time > stop_time {
            continue;
        }
        by_time.entry(time).or_default().push(FcdVehicle {
            id: VehicleId(row.id),
            position: GeoPoint::new(row.x, row.y),
            speed: row.speed,
        });
    }

    Ok(by_time.into_iter().map(|(time, vehicles)| MobilityBatch { time, vehicles }).collect())
}
