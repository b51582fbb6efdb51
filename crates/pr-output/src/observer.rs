//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use pr_core::SimTime;
use pr_decision::DecisionOutcome;
use pr_fleet::VehicleRegistry;
use pr_sim::{RunSummary, SimObserver};

use crate::row::{CollectionRow, DecisionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes scored decisions and per-collection role
/// counts to any [`OutputWriter`] backend (CSV, SQLite, Parquet).
///
/// Decisions are buffered and written at each collection and at the end of
/// the run.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After `sim.run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<DecisionRow>,
    written:    u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), written: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Decision rows handed to the writer so far.
    pub fn decisions_written(&self) -> u64 {
        self.written
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_decisions(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.pending);
        let result = self.writer.write_decisions(&rows);
        if result.is_ok() {
            self.written += rows.len() as u64;
        }
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_decision(&mut self, outcome: &DecisionOutcome) {
        if let Some(row) = DecisionRow::from_outcome(outcome) {
            self.pending.push(row);
        }
    }

    fn on_collect(&mut self, time: SimTime, registry: &VehicleRegistry) {
        self.flush_decisions();
        let result = self.writer.write_collection(&CollectionRow::collect(time, registry));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _summary: &RunSummary) {
        self.flush_decisions();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
