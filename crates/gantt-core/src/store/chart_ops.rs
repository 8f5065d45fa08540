//! Chart load/save operations for the ChartStore.

use tokio::task;

use super::{join_error, ChartStore};
use crate::{
    chart::{ChartConfig, ChartSnapshot, GanttChart},
    db::Database,
    error::Result,
};

impl ChartStore {
    /// Reads the stored chart as plain data.
    pub async fn load_snapshot(&self) -> Result<ChartSnapshot> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.load_snapshot()
        })
        .await
        .map_err(join_error)?
    }

    /// Reads and rebuilds the stored chart. The chart comes back without
    /// observers.
    pub async fn load_chart(&self) -> Result<GanttChart> {
        let snapshot = self.load_snapshot().await?;
        GanttChart::from_snapshot(snapshot)
    }

    /// Replaces the stored chart with `snapshot`.
    pub async fn save_snapshot(&self, snapshot: ChartSnapshot) -> Result<()> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.save_snapshot(&snapshot)
        })
        .await
        .map_err(join_error)?
    }

    /// Replaces the stored chart with the current state of `chart`.
    pub async fn save_chart(&self, chart: &GanttChart) -> Result<()> {
        self.save_snapshot(chart.snapshot()).await
    }

    /// Reads only the stored configuration.
    pub async fn load_config(&self) -> Result<ChartConfig> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.load_config()
        })
        .await
        .map_err(join_error)?
    }

    /// Number of stored steps.
    pub async fn step_count(&self) -> Result<usize> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.step_count()
        })
        .await
        .map_err(join_error)?
    }

    /// Deletes the stored chart.
    pub async fn reset(&self) -> Result<()> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.clear()
        })
        .await
        .map_err(join_error)?
    }
}
