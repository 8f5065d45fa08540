#![allow(dead_code)]

use gantt_core::{ChartStore, ChartStoreBuilder, GanttChart, Step, StepId};
use jiff::{SignedDuration, Timestamp};
use tempfile::TempDir;

/// 2024-01-01 00:00:00 UTC plus `days` days
pub fn day(days: i64) -> Timestamp {
    Timestamp::from_second(1_704_067_200).unwrap() + SignedDuration::from_hours(24 * days)
}

/// Helper function to create a test store
pub async fn create_test_store() -> (TempDir, ChartStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = ChartStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

/// Two roots, each with three children of three grandchildren.
pub fn create_project_chart() -> (GanttChart, Vec<StepId>) {
    let mut chart = GanttChart::new();
    let mut roots = Vec::new();
    for r in 0..2 {
        let root = chart
            .add_step(Step::new(format!("Root {r}"), day(0), day(9)))
            .expect("Failed to add root");
        for c in 0..3 {
            let child = chart
                .add_child_step(
                    &root,
                    Step::new(format!("Child {r}.{c}"), day(3 * c), day(3 * c + 3)),
                )
                .expect("Failed to add child");
            for g in 0..3 {
                chart
                    .add_child_step(
                        &child,
                        Step::new(format!("Grandchild {r}.{c}.{g}"), day(3 * c + g), day(3 * c + g + 1)),
                    )
                    .expect("Failed to add grandchild");
            }
        }
        roots.push(root);
    }
    (chart, roots)
}

pub fn visible_captions(chart: &GanttChart) -> Vec<String> {
    chart.visible_steps().map(|s| s.caption.clone()).collect()
}
