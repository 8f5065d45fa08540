//! Async persistence facade for a chart.
//!
//! [`ChartStore`] keeps only the database path. Every operation opens the
//! database inside `tokio::task::spawn_blocking`; the value crossing that
//! boundary is always a [`ChartSnapshot`](crate::chart::ChartSnapshot), never
//! a live [`GanttChart`](crate::GanttChart), whose observers are not `Send`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   GanttChart    │    │  ChartSnapshot  │    │    Database     │
//! │ (callbacks,     │◀──▶│ (plain data,    │◀──▶│   (via db/)     │
//! │  caller thread) │    │  Send)          │    │  blocking pool  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use gantt_core::{ChartStoreBuilder, GanttChart, Step};
//! use jiff::Timestamp;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ChartStoreBuilder::new()
//!     .with_database_path(Some("chart.db"))
//!     .build()
//!     .await?;
//!
//! let mut chart = store.load_chart().await?;
//! let ts = Timestamp::now();
//! chart.add_step(Step::new("Kickoff", ts, ts))?;
//! store.save_chart(&chart).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::task::JoinError;

use crate::error::GanttError;

pub mod builder;
pub mod chart_ops;


pub use builder::ChartStoreBuilder;

/// Handle on the database that stores one chart.
#[derive(Debug, Clone)]
pub struct ChartStore {
    pub(crate) db_path: PathBuf,
}

impl ChartStore {
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Location of the SQLite file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

pub(crate) fn join_error(e: JoinError) -> GanttError {
    GanttError::Configuration {
        message: format!("Task join error: {e}"),
    }
}
