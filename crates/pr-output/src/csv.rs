//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `decisions.csv`
//! - `collections.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CollectionRow, DecisionRow, OutputResult};

pub const DECISION_HEADER: [&str; 10] =
    ["time", "id", "dNew", "dBoost", "dSat", "dScore", "kappa", "lambda", "mu", "converted"];

pub const COLLECTION_HEADER: [&str; 4] = ["time", "active_vehicles", "parked", "relays"];

/// Writes decisions and collections to two CSV files.
pub struct CsvWriter {
    decisions:   Writer<File>,
    collections: Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut decisions = Writer::from_path(dir.join("decisions.csv"))?;
        decisions.write_record(DECISION_HEADER)?;

        let mut collections = Writer::from_path(dir.join("collections.csv"))?;
        collections.write_record(COLLECTION_HEADER)?;

        Ok(Self { decisions, collections, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        for row in rows {
            self.decisions.write_record(&[
                format!("{:.3}", row.time_secs),
                row.vehicle.to_string(),
                row.d_new.to_string(),
                row.d_boost.to_string(),
                row.d_sat.to_string(),
                row.d_score.to_string(),
                row.kappa.to_string(),
                row.lambda.to_string(),
                row.mu.to_string(),
                u8::from(row.converted).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_collection(&mut self, row: &CollectionRow) -> OutputResult<()> {
        self.collections.write_record(&[
            format!("{:.3}", row.time_secs),
            row.active_vehicles.to_string(),
            row.parked.to_string(),
            row.relays.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.decisions.flush()?;
        self.collections.flush()?;
        Ok(())
    }
}
