//! Published-record journal entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A durable record of one successfully published item.
///
/// Exactly one record exists per published item id for the lifetime of the
/// system; the state store enforces uniqueness on `item_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRecord {
    /// The source item id this record is for.
    pub item_id: String,
    /// When the target confirmed acceptance.
    pub published_at: DateTime<Utc>,
    /// Post identifier assigned by the target, when known.
    pub target_post_id: Option<String>,
}

impl PublishedRecord {
    /// Creates a record for an item published now.
    pub fn new(item_id: impl Into<String>, target_post_id: Option<String>) -> Self {
        Self {
            item_id: item_id.into(),
            published_at: Utc::now(),
            target_post_id,
        }
    }

    /// Creates a record with an explicit publish timestamp.
    pub fn at(
        item_id: impl Into<String>,
        published_at: DateTime<Utc>,
        target_post_id: Option<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            published_at,
            target_post_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_json_round_trip() {
        let record = PublishedRecord::new("feat-9", Some("post-42".into()));
        let line = serde_json::to_string(&record).unwrap();
        let decoded: PublishedRecord = serde_json::from_str(&line).unwrap();

        assert_eq!(decoded, record);
    }

    #[test]
    fn record_without_post_id() {
        let record = PublishedRecord::new("feat-9", None);
        assert!(record.target_post_id.is_none());
    }
}
