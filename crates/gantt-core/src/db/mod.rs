//! SQLite storage for chart snapshots.
//!
//! The database holds exactly one chart. It is always read and written as a
//! whole [`ChartSnapshot`](crate::chart::ChartSnapshot) inside a single
//! transaction, so a crash never leaves a half-written tree behind.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod chart_queries;

const SCHEMA_SQL: &str = include_str!("../../assets/schema.sql");

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Creates any missing table.
    fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute_batch(SCHEMA_SQL)
            .db_context("Failed to initialize database schema")
    }
}
