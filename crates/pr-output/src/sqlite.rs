//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `decisions` and `collections`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{CollectionRow, DecisionRow, OutputResult};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS decisions (
                 time      REAL    NOT NULL,
                 vehicle   INTEGER NOT NULL,
                 d_new     INTEGER NOT NULL,
                 d_boost   INTEGER NOT NULL,
                 d_sat     INTEGER NOT NULL,
                 d_score   REAL    NOT NULL,
                 kappa     REAL    NOT NULL,
                 lambda    REAL    NOT NULL,
                 mu        REAL    NOT NULL,
                 converted INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS collections (
                 time            REAL    PRIMARY KEY,
                 active_vehicles INTEGER NOT NULL,
                 parked          INTEGER NOT NULL,
                 relays          INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO decisions \
                 (time, vehicle, d_new, d_boost, d_sat, d_score, kappa, lambda, mu, converted) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_secs,
                    row.vehicle,
                    row.d_new as i64,
                    row.d_boost as i64,
                    row.d_sat as i64,
                    row.d_score,
                    row.kappa,
                    row.lambda,
                    row.mu,
                    row.converted as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_collection(&mut self, row: &CollectionRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO collections (time, active_vehicles, parked, relays) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                row.time_secs,
                row.active_vehicles as i64,
                row.parked as i64,
                row.relays as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
