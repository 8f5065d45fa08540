mod common;

use common::{create_project_chart, create_test_store, day, visible_captions};
use gantt_core::{ChartConfig, ChartStoreBuilder, Database, GanttError, RemovalPolicy, Step};
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_chart_survives_reopen() {
    let (temp_dir, store) = create_test_store().await;
    let (mut chart, roots) = create_project_chart();
    chart.expand(&roots[1]).unwrap();
    store.save_chart(&chart).await.expect("Failed to save chart");

    let reopened = ChartStoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .expect("Failed to reopen store");
    let loaded = reopened.load_chart().await.expect("Failed to load chart");

    assert_eq!(loaded.len(), 26);
    assert_eq!(
        visible_captions(&loaded),
        vec!["Root 0", "Root 1", "Child 1.0", "Child 1.1", "Child 1.2"]
    );
    assert!(loaded.is_expanded(&roots[1]));
}

#[tokio::test]
async fn test_edit_cycle_through_store() {
    let (_temp_dir, store) = create_test_store().await;
    let (chart, roots) = create_project_chart();
    store.save_chart(&chart).await.unwrap();

    let mut chart = store.load_chart().await.unwrap();
    chart.expand(&roots[0]).unwrap();
    let first_child = chart.step_at(1).unwrap().uid().clone();
    chart.detach(&first_child).unwrap();
    store.save_chart(&chart).await.unwrap();

    let chart = store.load_chart().await.unwrap();
    assert!(chart.is_root(&first_child));
    assert_eq!(chart.root_steps().count(), 3);
    assert_eq!(
        visible_captions(&chart),
        vec!["Root 0", "Child 0.1", "Child 0.2", "Root 1", "Child 0.0"]
    );
}

#[tokio::test]
async fn test_orphans_survive_persistence() {
    let (_temp_dir, store) = create_test_store().await;
    let (mut chart, roots) = create_project_chart();
    chart.expand(&roots[0]).unwrap();
    chart.remove_step(&roots[0]).unwrap();
    store.save_chart(&chart).await.unwrap();

    let loaded = store.load_chart().await.unwrap();

    assert_eq!(loaded.len(), 25);
    assert_eq!(loaded.snapshot(), chart.snapshot());
    assert_eq!(
        visible_captions(&loaded),
        vec!["Child 0.0", "Child 0.1", "Child 0.2", "Root 1"]
    );
}

#[tokio::test]
async fn test_removed_child_links_survive_persistence() {
    let (_temp_dir, store) = create_test_store().await;
    let (mut chart, roots) = create_project_chart();
    chart.expand(&roots[1]).unwrap();
    let child = chart.step_at(2).unwrap().uid().clone();
    chart.remove_step(&child).unwrap();
    store.save_chart(&chart).await.unwrap();

    let mut loaded = store.load_chart().await.unwrap();

    assert_eq!(loaded.tree().children(&roots[1]).len(), 3);
    assert_eq!(loaded.tree().children(&roots[1])[0], child);
    assert_eq!(loaded.snapshot(), chart.snapshot());

    let again = Step::with_uid(child, "Child 1.0 again", day(0), day(1));
    assert!(matches!(
        loaded.add_step(again),
        Err(GanttError::DuplicateStep { .. })
    ));
}

#[test]
fn test_database_file_round_trip() {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let (chart, _) = create_project_chart();
    let snapshot = chart.snapshot();
    {
        let mut db = Database::new(temp_file.path()).expect("Failed to create test database");
        db.save_snapshot(&snapshot).unwrap();
    }

    let db = Database::new(temp_file.path()).unwrap();
    assert_eq!(db.load_snapshot().unwrap(), snapshot);
    assert_eq!(db.load_config().unwrap(), ChartConfig::default());
    assert_ne!(db.load_config().unwrap().removal_policy, RemovalPolicy::DetachSubtree);
}
