//! Whole-chart reads and writes.

use std::collections::HashMap;

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, types::Type, Transaction};

use crate::{
    chart::{ChartConfig, ChartSnapshot, RemovalPolicy, StepRecord},
    error::{DatabaseResultExt, GanttError, Result},
    models::StepId,
};

const INSERT_STEP_SQL: &str = "INSERT INTO steps (uid, caption, start_at, end_at, background_color, predecessor, parent, tree_order) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const INSERT_CHILD_SQL: &str = "INSERT INTO step_children (parent, position, child) VALUES (?1, ?2, ?3)";
const INSERT_ROW_SQL: &str = "INSERT INTO visible_rows (row_index, uid) VALUES (?1, ?2)";
const INSERT_EXPANDED_SQL: &str = "INSERT INTO expanded_steps (uid) VALUES (?1)";
const INSERT_SETTING_SQL: &str = "INSERT INTO chart_settings (key, value) VALUES (?1, ?2)";
const SELECT_STEPS_SQL: &str = "SELECT uid, caption, start_at, end_at, background_color, predecessor, parent FROM steps ORDER BY tree_order";
const SELECT_CHILDREN_SQL: &str = "SELECT parent, child FROM step_children ORDER BY parent, position";
const SELECT_ROWS_SQL: &str = "SELECT uid FROM visible_rows ORDER BY row_index";
const SELECT_EXPANDED_SQL: &str = "SELECT uid FROM expanded_steps ORDER BY uid";
const SELECT_SETTINGS_SQL: &str = "SELECT key, value FROM chart_settings";
const COUNT_STEPS_SQL: &str = "SELECT COUNT(*) FROM steps";
const CLEAR_SQL: &str = "DELETE FROM steps; DELETE FROM step_children; DELETE FROM visible_rows; DELETE FROM expanded_steps; DELETE FROM chart_settings;";

fn conversion_error(column: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}

/// Reads a text column that must hold a step identifier.
fn get_uid(row: &rusqlite::Row, column: usize) -> rusqlite::Result<StepId> {
    row.get::<_, String>(column)?
        .parse()
        .map_err(|e: GanttError| conversion_error(column, e))
}

fn get_optional_uid(row: &rusqlite::Row, column: usize) -> rusqlite::Result<Option<StepId>> {
    row.get::<_, Option<String>>(column)?
        .map(|uid| uid.parse().map_err(|e: GanttError| conversion_error(column, e)))
        .transpose()
}

fn get_timestamp(row: &rusqlite::Row, column: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(column)?
        .parse::<Timestamp>()
        .map_err(|e| conversion_error(column, e))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|_| GanttError::Configuration {
        message: format!("setting '{key}' has invalid value '{value}'"),
    })
}

impl super::Database {
    /// Helper function to construct a StepRecord from a database row
    fn build_record_from_row(row: &rusqlite::Row) -> rusqlite::Result<StepRecord> {
        let background_color = row
            .get::<_, Option<String>>(4)?
            .map(|color| color.parse().map_err(|e: GanttError| conversion_error(4, e)))
            .transpose()?;

        Ok(StepRecord {
            uid: get_uid(row, 0)?,
            caption: row.get(1)?,
            start: get_timestamp(row, 2)?,
            end: get_timestamp(row, 3)?,
            background_color,
            predecessor: get_optional_uid(row, 5)?,
            parent: get_optional_uid(row, 6)?,
            children: Vec::new(),
        })
    }

    /// Replaces the stored chart with `snapshot`.
    pub fn save_snapshot(&mut self, snapshot: &ChartSnapshot) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute_batch(CLEAR_SQL)
            .db_context("Failed to clear previous chart")?;
        Self::insert_steps(&tx, &snapshot.steps)?;

        for (index, uid) in snapshot.visible_rows.iter().enumerate() {
            tx.execute(INSERT_ROW_SQL, params![index as i64, uid.as_str()])
                .db_context("Failed to insert visible row")?;
        }
        for uid in &snapshot.expanded {
            tx.execute(INSERT_EXPANDED_SQL, params![uid.as_str()])
                .db_context("Failed to insert expanded step")?;
        }
        Self::insert_settings(&tx, &snapshot.config)?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!(
            "Saved chart: {} steps, {} visible rows",
            snapshot.steps.len(),
            snapshot.visible_rows.len()
        );
        Ok(())
    }

    fn insert_steps(tx: &Transaction<'_>, steps: &[StepRecord]) -> Result<()> {
        let mut stmt = tx
            .prepare(INSERT_STEP_SQL)
            .db_context("Failed to prepare step insert")?;
        for (order, step) in steps.iter().enumerate() {
            stmt.execute(params![
                step.uid.as_str(),
                step.caption,
                step.start.to_string(),
                step.end.to_string(),
                step.background_color.as_ref().map(|c| c.as_str()),
                step.predecessor.as_ref().map(|p| p.as_str()),
                step.parent.as_ref().map(|p| p.as_str()),
                order as i64,
            ])
            .db_context("Failed to insert step")?;
        }

        let mut stmt = tx
            .prepare(INSERT_CHILD_SQL)
            .db_context("Failed to prepare child insert")?;
        for step in steps {
            for (position, child) in step.children.iter().enumerate() {
                stmt.execute(params![step.uid.as_str(), position as i64, child.as_str()])
                    .db_context("Failed to insert child link")?;
            }
        }
        Ok(())
    }

    fn insert_settings(tx: &Transaction<'_>, config: &ChartConfig) -> Result<()> {
        let settings = [
            ("removal_policy", config.removal_policy.as_str().to_string()),
            ("movable_steps", config.movable_steps.to_string()),
            ("resizable_steps", config.resizable_steps.to_string()),
            (
                "movable_steps_between_rows",
                config.movable_steps_between_rows.to_string(),
            ),
        ];
        for (key, value) in settings {
            tx.execute(INSERT_SETTING_SQL, params![key, value])
                .db_context("Failed to insert chart setting")?;
        }
        Ok(())
    }

    /// Reads the stored chart. An empty database yields an empty snapshot
    /// with the default configuration.
    pub fn load_snapshot(&self) -> Result<ChartSnapshot> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_SQL)
            .db_context("Failed to prepare step query")?;
        let mut steps = stmt
            .query_map([], Self::build_record_from_row)
            .db_context("Failed to query steps")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read steps")?;

        let mut children = self.load_children()?;
        for step in &mut steps {
            step.children = children.remove(&step.uid).unwrap_or_default();
        }

        let visible_rows = self.load_uids(SELECT_ROWS_SQL)?;
        let expanded = self.load_uids(SELECT_EXPANDED_SQL)?;
        let config = self.load_config()?;

        Ok(ChartSnapshot {
            config,
            steps,
            visible_rows,
            expanded,
        })
    }

    /// Child sequences keyed by parent, dangling identifiers included.
    fn load_children(&self) -> Result<HashMap<StepId, Vec<StepId>>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_CHILDREN_SQL)
            .db_context("Failed to prepare child query")?;
        let links = stmt
            .query_map([], |row| Ok((get_uid(row, 0)?, get_uid(row, 1)?)))
            .db_context("Failed to query child links")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read child links")?;

        let mut children: HashMap<StepId, Vec<StepId>> = HashMap::new();
        for (parent, child) in links {
            children.entry(parent).or_default().push(child);
        }
        Ok(children)
    }

    fn load_uids(&self, sql: &str) -> Result<Vec<StepId>> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .db_context("Failed to prepare identifier query")?;
        let uids = stmt
            .query_map([], |row| get_uid(row, 0))
            .db_context("Failed to query identifiers")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read identifiers")?;
        Ok(uids)
    }

    /// Reads the stored settings on top of the defaults. Unknown keys are
    /// ignored.
    pub fn load_config(&self) -> Result<ChartConfig> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SETTINGS_SQL)
            .db_context("Failed to prepare settings query")?;
        let settings = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .db_context("Failed to query settings")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read settings")?;

        let mut config = ChartConfig::default();
        for (key, value) in settings {
            match key.as_str() {
                "removal_policy" => {
                    config.removal_policy = value
                        .parse::<RemovalPolicy>()
                        .map_err(|message| GanttError::Configuration { message })?;
                }
                "movable_steps" => config.movable_steps = parse_flag(&key, &value)?,
                "resizable_steps" => config.resizable_steps = parse_flag(&key, &value)?,
                "movable_steps_between_rows" => {
                    config.movable_steps_between_rows = parse_flag(&key, &value)?;
                }
                other => debug!("Ignoring unknown chart setting '{other}'"),
            }
        }
        Ok(config)
    }

    /// Number of stored steps.
    pub fn step_count(&self) -> Result<usize> {
        let count: i64 = self
            .connection
            .query_row(COUNT_STEPS_SQL, [], |row| row.get(0))
            .db_context("Failed to count steps")?;
        Ok(count as usize)
    }

    /// Deletes the stored chart, settings included.
    pub fn clear(&mut self) -> Result<()> {
        self.connection
            .execute_batch(CLEAR_SQL)
            .db_context("Failed to clear chart")
    }
}
