//! `pr-output`: files written by a parkrelay run.
//!
//! Hook records go to one `<hook>.log` file per enabled hook through
//! [`FileHookSink`].  Decisions and periodic role counts go to one of three
//! backends behind Cargo features:
//!
//! | Feature   | Backend | Files created                              |
//! |-----------|---------|--------------------------------------------|
//! | *(none)*  | CSV     | `decisions.csv`, `collections.csv`         |
//! | `sqlite`  | SQLite  | `output.db`                                |
//! | `parquet` | Parquet | `decisions.parquet`, `collections.parquet` |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `pr_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let sink = FileHookSink::create(&config.stats.folder, config.stats.hook_set()?)?;
//! let mut sim = SimBuilder::new(config, batches).sink(sink).build()?;
//! let mut obs = SimOutputObserver::new(CsvWriter::new(&folder)?);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! sim.into_sink().finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod hook_file;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use hook_file::FileHookSink;
pub use observer::SimOutputObserver;
pub use row::{CollectionRow, DecisionRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
