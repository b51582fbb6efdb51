//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CollectionRow, DecisionRow, OutputResult};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors are stored by [`SimOutputObserver`][crate::SimOutputObserver] and
/// retrieved with its `take_error`.
pub trait OutputWriter {
    /// Write a batch of decision rows.
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()>;

    /// Write one collection row.
    fn write_collection(&mut self, row: &CollectionRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
