//! In-memory state store.

use crate::error::StoreResult;
use crate::store::StateStore;
use herald_protocol::PublishedRecord;
use parking_lot::Mutex;
use std::collections::HashSet;

/// An in-memory state store.
///
/// Provides no durability; state is lost when the process exits. Backs tests
/// and the `memory://` DSN.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    ids: HashSet<String>,
    records: Vec<PublishedRecord>,
}

impl MemoryStateStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given records.
    pub fn with_records(records: Vec<PublishedRecord>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock();
            for record in records {
                if inner.ids.insert(record.item_id.clone()) {
                    inner.records.push(record);
                }
            }
        }
        store
    }
}

impl StateStore for MemoryStateStore {
    fn contains(&self, item_id: &str) -> bool {
        self.inner.lock().ids.contains(item_id)
    }

    fn record(&self, record: PublishedRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        if inner.ids.insert(record.item_id.clone()) {
            inner.records.push(record);
        }
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        Ok(())
    }

    fn records(&self) -> Vec<PublishedRecord> {
        self.inner.lock().records.clone()
    }

    fn len(&self) -> usize {
        self.inner.lock().records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_contains() {
        let store = MemoryStateStore::new();
        assert!(!store.contains("feat-1"));

        store
            .record(PublishedRecord::new("feat-1", Some("post-1".into())))
            .unwrap();

        assert!(store.contains("feat-1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn record_is_idempotent() {
        let store = MemoryStateStore::new();
        store.record(PublishedRecord::new("feat-1", None)).unwrap();
        store
            .record(PublishedRecord::new("feat-1", Some("post-9".into())))
            .unwrap();

        assert_eq!(store.len(), 1);
        // The first record wins; a re-record never rewrites history.
        assert!(store.records()[0].target_post_id.is_none());
    }

    #[test]
    fn pre_populated_store() {
        let store = MemoryStateStore::with_records(vec![
            PublishedRecord::new("1", None),
            PublishedRecord::new("3", None),
        ]);

        assert!(store.contains("1"));
        assert!(!store.contains("2"));
        assert!(store.contains("3"));
        assert_eq!(store.len(), 2);
    }
}
