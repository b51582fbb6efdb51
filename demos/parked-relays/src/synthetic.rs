//! A small synthetic mobility feed around downtown Porto.
//!
//! Vehicles loop along four parallel east-west streets.  Every third
//! vehicle leaves the feed part-way through (and parks there); a few of
//! those come back later.

use std::fmt::Write;
use std::io::Cursor;

use pr_core::SimTime;
use pr_schedule::{MobilityBatch, ScheduleResult, load_mobility_reader};

const VEHICLES: u32 = 36;
const STREETS: u32 = 4;
const WEST_LON: f64 = -8.6135;
const SOUTH_LAT: f64 = 41.1485;
/// Degrees between neighbouring streets (about 55 m).
const STREET_SPACING: f64 = 0.0005;
/// Length of a street loop, in degrees of longitude (about 600 m).
const LOOP_LENGTH: f64 = 0.0072;
/// Degrees of longitude per metre at this latitude.
const LON_PER_METER: f64 = 1.0 / 83_800.0;

fn leaves_at(vehicle: u32) -> Option<u64> {
    (vehicle % 3 == 0).then(|| 40 + 15 * u64::from(vehicle))
}

fn returns_at(vehicle: u32) -> Option<u64> {
    leaves_at(vehicle).filter(|_| vehicle % 9 == 0).map(|t| t + 400)
}

fn present(vehicle: u32, t: u64) -> bool {
    match (leaves_at(vehicle), returns_at(vehicle)) {
        (Some(gone), Some(back)) => t < gone || t >= back,
        (Some(gone), None) => t < gone,
        _ => true,
    }
}

/// Seconds spent driving by `t`; parked time does not advance a vehicle
/// along its loop.
fn driving_secs(vehicle: u32, t: u64) -> u64 {
    match (leaves_at(vehicle), returns_at(vehicle)) {
        (Some(gone), Some(back)) if t >= back => gone + (t - back),
        (Some(gone), _) => t.min(gone),
        _ => t,
    }
}

/// The feed as TSV text, one row per vehicle per second up to `stop`.
pub fn feed_tsv(stop_secs: u64) -> String {
    let mut out = String::from("time\tid\tx\ty\tspeed\n");
    for t in 0..=stop_secs {
        for v in 0..VEHICLES {
            if !present(v, t) {
                continue;
            }
            let speed = 6.0 + f64::from(v % 5);
            let street = v % STREETS;
            let driven = driving_secs(v, t) as f64;
            let offset = f64::from(v) * 0.0002;
            let along = (offset + driven * speed * LON_PER_METER) % LOOP_LENGTH;
            let x = WEST_LON + along;
            let y = SOUTH_LAT + f64::from(street) * STREET_SPACING;
            let _ = writeln!(out, "{t}\t{}\t{x:.6}\t{y:.6}\t{speed:.2}", 1000 + v);
        }
    }
    out
}

/// Parse [`feed_tsv`] through the regular feed loader.
pub fn feed(stop: SimTime) -> ScheduleResult<Vec<MobilityBatch>> {
    let secs = stop.as_secs_f64().ceil() as u64;
    load_mobility_reader(Cursor::new(feed_tsv(secs)), b'\t', stop)
}

#[cfg(test)]
mod tests {
    use pr_core::SimTime;

    use super::{VEHICLES, feed, present};

    #[test]
    fn every_third_vehicle_parks_and_some_return() {
        assert!(present(1, 10_000));
        assert!(!present(3, 100));
        assert!(present(9, 40 + 135 + 400));
        assert!(!present(9, 40 + 135));
    }

    #[test]
    fn loads_through_the_feed_loader() {
        let batches = feed(SimTime::from_secs(20)).unwrap();
        assert_eq!(batches.len(), 21);
        assert_eq!(batches[0].vehicles.len(), VEHICLES as usize);
    }
}
