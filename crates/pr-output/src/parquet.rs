//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `decisions.parquet`
//! - `collections.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{BooleanBuilder, Float64Builder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{CollectionRow, DecisionRow, OutputResult};

fn decision_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time",      DataType::Float64, false),
        Field::new("vehicle",   DataType::UInt32,  false),
        Field::new("d_new",     DataType::UInt64,  false),
        Field::new("d_boost",   DataType::UInt64,  false),
        Field::new("d_sat",     DataType::UInt64,  false),
        Field::new("d_score",   DataType::Float64, false),
        Field::new("kappa",     DataType::Float64, false),
        Field::new("lambda",    DataType::Float64, false),
        Field::new("mu",        DataType::Float64, false),
        Field::new("converted", DataType::Boolean, false),
    ]))
}

fn collection_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time",            DataType::Float64, false),
        Field::new("active_vehicles", DataType::UInt64,  false),
        Field::new("parked",          DataType::UInt64,  false),
        Field::new("relays",          DataType::UInt64,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder().set_compression(Compression::SNAPPY).build()
}

/// Writes run output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    decisions:     Option<ArrowWriter<File>>,
    collections:   Option<ArrowWriter<File>>,
    dec_schema:    Arc<Schema>,
    coll_schema:   Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let dec_schema = decision_schema();
        let coll_schema = collection_schema();

        let dec_file = File::create(dir.join("decisions.parquet"))?;
        let decisions = ArrowWriter::try_new(dec_file, Arc::clone(&dec_schema), Some(snappy_props()))?;

        let coll_file = File::create(dir.join("collections.parquet"))?;
        let collections =
            ArrowWriter::try_new(coll_file, Arc::clone(&coll_schema), Some(snappy_props()))?;

        Ok(Self {
            decisions: Some(decisions),
            collections: Some(collections),
            dec_schema,
            coll_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.decisions.as_mut() else {
            return Ok(());
        };

        let mut times     = Float64Builder::new();
        let mut vehicles  = UInt32Builder::new();
        let mut d_new     = UInt64Builder::new();
        let mut d_boost   = UInt64Builder::new();
        let mut d_sat     = UInt64Builder::new();
        let mut d_score   = Float64Builder::new();
        let mut kappa     = Float64Builder::new();
        let mut lambda    = Float64Builder::new();
        let mut mu        = Float64Builder::new();
        let mut converted = BooleanBuilder::new();

        for row in rows {
            times.append_value(row.time_secs);
            vehicles.append_value(row.vehicle);
            d_new.append_value(row.d_new);
            d_boost.append_value(row.d_boost);
            d_sat.append_value(row.d_sat);
            d_score.append_value(row.d_score);
            kappa.append_value(row.kappa);
            lambda.append_value(row.lambda);
            mu.append_value(row.mu);
            converted.append_value(row.converted);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.dec_schema),
            vec![
                Arc::new(times.finish()),
                Arc::new(vehicles.finish()),
                Arc::new(d_new.finish()),
                Arc::new(d_boost.finish()),
                Arc::new(d_sat.finish()),
                Arc::new(d_score.finish()),
                Arc::new(kappa.finish()),
                Arc::new(lambda.finish()),
                Arc::new(mu.finish()),
                Arc::new(converted.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_collection(&mut self, row: &CollectionRow) -> OutputResult<()> {
        let Some(writer) = self.collections.as_mut() else {
            return Ok(());
        };

        let mut times   = Float64Builder::new();
        let mut active  = UInt64Builder::new();
        let mut parked  = UInt64Builder::new();
        let mut relays  = UInt64Builder::new();

        times.append_value(row.time_secs);
        active.append_value(row.active_vehicles);
        parked.append_value(row.parked);
        relays.append_value(row.relays);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.coll_schema),
            vec![
                Arc::new(times.finish()),
                Arc::new(active.finish()),
                Arc::new(parked.finish()),
                Arc::new(relays.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.decisions.take() {
            w.close()?;
        }
        if let Some(w) = self.collections.take() {
            w.close()?;
        }
        Ok(())
    }
}
