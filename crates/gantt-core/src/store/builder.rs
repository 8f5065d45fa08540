//! Builder for creating and configuring ChartStore instances.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use super::{join_error, ChartStore};
use crate::{
    db::Database,
    error::{GanttError, Result},
};

/// Builder for creating and configuring ChartStore instances.
#[derive(Debug, Clone, Default)]
pub struct ChartStoreBuilder {
    database_path: Option<PathBuf>,
}

impl ChartStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_DATA_HOME/gantt/gantt.db` or `~/.local/share/gantt/gantt.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Creates the database file and schema if needed and returns the store.
    ///
    /// # Errors
    ///
    /// Returns `GanttError::XdgDirectory` if no default location can be found
    /// Returns `GanttError::FileSystem` if the parent directory cannot be created
    /// Returns `GanttError::Database` if database initialization fails
    pub async fn build(self) -> Result<ChartStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GanttError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), GanttError>(())
        })
        .await
        .map_err(join_error)??;

        debug!("Using chart database at {}", db_path.display());
        Ok(ChartStore::new(db_path))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("gantt")
            .place_data_file("gantt.db")
            .map_err(|e| GanttError::XdgDirectory(e.to_string()))
    }
}
