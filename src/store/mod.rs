//! SQLite stats database
//!
//! Owns the single connection used by a tool invocation. Schema and seed rows
//! are created on open, so a fresh file is immediately usable.

pub mod queries;
pub mod records;
pub mod reference;
mod schema;
pub mod unit;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Result, Transaction};

use crate::constants::DB_BUSY_TIMEOUT_SECS;
pub use unit::{ReplaceSummary, TableCounts, UnitKey, UnitPayload, replace_unit};

/// Database wrapper for ingested stats
pub struct StatsDatabase {
    conn: Connection,
}

impl StatsDatabase {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(Duration::from_secs(DB_BUSY_TIMEOUT_SECS))?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        // Declared keys are documentation only: events carry team and
        // official ids in the person columns
        self.conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        self.conn.execute_batch(schema::SCHEMA_SQL)?;
        self.conn.execute_batch(schema::SEED_SQL)?;
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Start the transaction that bounds one unit of work. Dropping it without
    /// `commit` rolls everything back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction()
    }

    /// Row count of a table
    pub fn table_count(&self, table: &str) -> Result<u64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
    }

    /// Row counts of the four fact tables
    pub fn fact_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            games: self.table_count("games")? as usize,
            team_stats: self.table_count("game_team_stats")? as usize,
            events: self.table_count("game_events")? as usize,
            shots: self.table_count("game_shot_charts")? as usize,
        })
    }
}
