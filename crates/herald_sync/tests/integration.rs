//! Integration tests for the sync engine over a durable file store.

use herald_protocol::{Item, ItemPage};
use herald_store::{FileStateStore, StateStore};
use herald_sync::{
    MockPublisher, MockSource, RetryConfig, SyncConfig, SyncEngine, TargetError,
};
use std::time::Duration;

fn item(id: &str, status: &str) -> Item {
    Item::new(id, format!("Feature {id}"), status).with_description(format!("Description {id}"))
}

fn feed() -> Vec<ItemPage> {
    vec![
        ItemPage::new(
            vec![item("1", "Released"), item("2", "In Progress")],
            Some("c2".into()),
        ),
        ItemPage::last(vec![item("3", "Released")]),
    ]
}

fn config() -> SyncConfig {
    SyncConfig::new("src-tok", "tgt-tok", "file://state").with_retry(
        RetryConfig::new(3).with_initial_delay(Duration::from_millis(1)),
    )
}

#[test]
fn full_run_then_idempotent_rerun() {
    let temp = tempfile::tempdir().unwrap();
    let state_dir = temp.path().join("state");

    // First run: cold store, both released items published.
    {
        let store = FileStateStore::open(&state_dir).unwrap();
        let engine = SyncEngine::new(
            config(),
            MockSource::with_pages(feed()),
            MockPublisher::new(),
            store,
        );

        let summary = engine.run().unwrap();
        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.released, 2);
        assert_eq!(summary.published, 2);
        assert_eq!(summary.skipped, 0);
        assert!(summary.failures.is_empty());
    }

    // Second run: fresh process, warm store, same feed. Nothing publishes.
    {
        let store = FileStateStore::open(&state_dir).unwrap();
        let publisher = MockPublisher::new();
        let engine = SyncEngine::new(config(), MockSource::with_pages(feed()), publisher, store);

        let summary = engine.run().unwrap();
        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.released, 2);
        assert_eq!(summary.published, 0);
        assert_eq!(summary.skipped, 2);
        assert!(summary.failures.is_empty());
    }
}

#[test]
fn partial_failure_isolation_survives_restart() {
    let temp = tempfile::tempdir().unwrap();
    let state_dir = temp.path().join("state");

    let all_released = || {
        vec![ItemPage::last(vec![
            item("a", "Released"),
            item("b", "Released"),
            item("c", "Released"),
        ])]
    };

    // Run 1: item b is rejected; a and c are published and recorded.
    {
        let store = FileStateStore::open(&state_dir).unwrap();
        let publisher = MockPublisher::new();
        publisher.fail_with(
            "b",
            vec![TargetError::Rejected {
                status: 400,
                message: "invalid post".into(),
            }],
        );
        let engine = SyncEngine::new(
            config(),
            MockSource::with_pages(all_released()),
            publisher,
            store,
        );

        let summary = engine.run().unwrap();
        assert_eq!(summary.published, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].item_id, "b");
        assert!(engine.store().contains("a"));
        assert!(engine.store().contains("c"));
    }

    // Run 2: the rejection is resolved; only b is published.
    {
        let store = FileStateStore::open(&state_dir).unwrap();
        let publisher = MockPublisher::new();
        let engine = SyncEngine::new(
            config(),
            MockSource::with_pages(all_released()),
            publisher,
            store,
        );

        let summary = engine.run().unwrap();
        assert_eq!(summary.published, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(engine.publisher().published_ids(), vec!["b".to_string()]);
    }
}

#[test]
fn transient_failures_recover_within_one_run() {
    let temp = tempfile::tempdir().unwrap();
    let state_dir = temp.path().join("state");

    let store = FileStateStore::open(&state_dir).unwrap();
    let publisher = MockPublisher::new();
    publisher.fail_with(
        "1",
        vec![
            TargetError::Transient("HTTP 503".into()),
            TargetError::Transient("HTTP 503".into()),
        ],
    );
    let engine = SyncEngine::new(
        config(),
        MockSource::with_items(vec![item("1", "Released")]),
        publisher,
        store,
    );

    let summary = engine.run().unwrap();
    assert_eq!(summary.published, 1);
    assert!(summary.failures.is_empty());
    assert_eq!(engine.store().records().len(), 1);
}

#[test]
fn store_lock_prevents_overlapping_runs() {
    let temp = tempfile::tempdir().unwrap();
    let state_dir = temp.path().join("state");

    let _held = FileStateStore::open(&state_dir).unwrap();
    assert!(FileStateStore::open(&state_dir).is_err());
}
