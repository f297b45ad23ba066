//! Target-side post payloads.

use crate::Item;
use serde::{Deserialize, Serialize};

/// Fallback title for items with an empty title.
pub const FALLBACK_TITLE: &str = "Released Feature";
/// Fallback content for items with an empty description.
pub const FALLBACK_CONTENT: &str = "No description";

/// The write payload accepted by the target's post operation.
///
/// Serializes to the target's wire shape: `{title, content, publishNow}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Whether the target should publish immediately rather than draft.
    pub publish_now: bool,
}

impl PostPayload {
    /// Builds the announcement payload for an item.
    ///
    /// Empty titles and descriptions fall back to fixed literals so the
    /// target never rejects a post for missing fields.
    pub fn for_item(item: &Item) -> Self {
        let title = if item.title.is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            item.title.clone()
        };
        let content = if item.description.is_empty() {
            FALLBACK_CONTENT.to_string()
        } else {
            item.description.clone()
        };

        Self {
            title,
            content,
            publish_now: true,
        }
    }
}

/// The target's acknowledgement of an accepted post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostReceipt {
    /// Post identifier assigned by the target, when the response carries one.
    pub post_id: Option<String>,
}

impl PostReceipt {
    /// Creates a receipt with an assigned post id.
    pub fn with_id(post_id: impl Into<String>) -> Self {
        Self {
            post_id: Some(post_id.into()),
        }
    }

    /// Creates a receipt for a response without a usable post id.
    pub fn anonymous() -> Self {
        Self { post_id: None }
    }
}
