//! State-store trait.

use crate::error::StoreResult;
use herald_protocol::PublishedRecord;

/// Access to the set of already-published item ids.
///
/// This is what makes the pipeline idempotent across scheduled runs: the
/// orchestrator consults `contains` before publishing and calls `record` +
/// `persist` after each confirmed publish, so a crash mid-run never loses
/// confirmed publications.
pub trait StateStore: Send + Sync {
    /// Returns true if the item id has already been published.
    fn contains(&self, item_id: &str) -> bool;

    /// Records a published item.
    ///
    /// Recording an id that is already present is a no-op, not an error.
    fn record(&self, record: PublishedRecord) -> StoreResult<()>;

    /// Flushes recorded state to durable storage.
    fn persist(&self) -> StoreResult<()>;

    /// Returns all records, in the order they were recorded.
    fn records(&self) -> Vec<PublishedRecord>;

    /// Returns the number of recorded items.
    fn len(&self) -> usize;

    /// Returns true if nothing has been recorded.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn contains(&self, item_id: &str) -> bool {
        (**self).contains(item_id)
    }

    fn record(&self, record: PublishedRecord) -> StoreResult<()> {
        (**self).record(record)
    }

    fn persist(&self) -> StoreResult<()> {
        (**self).persist()
    }

    fn records(&self) -> Vec<PublishedRecord> {
        (**self).records()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
