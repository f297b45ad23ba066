//! Target abstraction for publishing announcements.

use crate::error::TargetError;
use herald_protocol::{Item, PostReceipt};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// A sink that turns a released item into a published announcement.
pub trait Publisher: Send + Sync {
    /// Publishes one item and returns the target's receipt.
    fn publish(&self, item: &Item) -> Result<PostReceipt, TargetError>;
}

/// A mock publisher for testing.
///
/// Records every accepted item and can be scripted to fail specific items
/// with a queue of errors, consumed one per publish attempt.
#[derive(Debug, Default)]
pub struct MockPublisher {
    published: Mutex<Vec<Item>>,
    scripted_failures: Mutex<HashMap<String, VecDeque<TargetError>>>,
    attempts: Mutex<HashMap<String, usize>>,
}

impl MockPublisher {
    /// Creates a publisher that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues errors for an item; each publish attempt consumes one, and the
    /// attempt after the queue drains succeeds.
    pub fn fail_with(&self, item_id: impl Into<String>, errors: Vec<TargetError>) {
        self.scripted_failures
            .lock()
            .entry(item_id.into())
            .or_default()
            .extend(errors);
    }

    /// Returns the items accepted so far, in publish order.
    pub fn published(&self) -> Vec<Item> {
        self.published.lock().clone()
    }

    /// Returns the ids of accepted items, in publish order.
    pub fn published_ids(&self) -> Vec<String> {
        self.published.lock().iter().map(|i| i.id.clone()).collect()
    }

    /// Returns how many publish attempts were made for an item.
    pub fn attempts(&self, item_id: &str) -> usize {
        self.attempts.lock().get(item_id).copied().unwrap_or(0)
    }
}

impl Publisher for MockPublisher {
    fn publish(&self, item: &Item) -> Result<PostReceipt, TargetError> {
        *self.attempts.lock().entry(item.id.clone()).or_insert(0) += 1;

        if let Some(queue) = self.scripted_failures.lock().get_mut(&item.id) {
            if let Some(err) = queue.pop_front() {
                return Err(err);
            }
        }

        let mut published = self.published.lock();
        published.push(item.clone());
        Ok(PostReceipt::with_id(format!("post-{}", published.len())))
    }
}
