//! Source-side items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product item as reported by the source system.
///
/// Identity is `id`, which the source assigns and keeps stable. Every other
/// field may change between polls and must not affect dedup decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque source-assigned identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Status display name (e.g. "Released", "In Progress").
    pub status_name: String,
    /// Last update timestamp, when the source reports one.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Creates an item with the given id, title, and status name.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        status_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status_name: status_name.into(),
            updated_at: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the update timestamp.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }
}

/// One page of items from a paginated source query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPage {
    /// Items on this page, in source order.
    pub items: Vec<Item>,
    /// Cursor for the next page, or `None` when this is the last page.
    pub next_cursor: Option<String>,
}

impl ItemPage {
    /// Creates a page with a continuation cursor.
    pub fn new(items: Vec<Item>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Creates a final page with no continuation.
    pub fn last(items: Vec<Item>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_builder() {
        let item = Item::new("feat-1", "Dark mode", "Released")
            .with_description("Dark mode for the dashboard");

        assert_eq!(item.id, "feat-1");
        assert_eq!(item.title, "Dark mode");
        assert_eq!(item.status_name, "Released");
        assert_eq!(item.description, "Dark mode for the dashboard");
        assert!(item.updated_at.is_none());
    }

    #[test]
    fn page_last_has_no_cursor() {
        let page = ItemPage::last(vec![Item::new("a", "A", "Released")]);
        assert_eq!(page.items.len(), 1);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn page_with_cursor() {
        let page = ItemPage::new(vec![], Some("cursor-2".into()));
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
    }
}
