//! Run summaries and reports.

use serde::{Deserialize, Serialize};

/// A per-item publish failure surfaced in the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    /// The item that failed to publish.
    pub item_id: String,
    /// Human-readable failure reason.
    pub reason: String,
}

impl ItemFailure {
    /// Creates a failure entry.
    pub fn new(item_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            reason: reason.into(),
        }
    }
}

/// Counters and failures from one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Items fetched from the source, across all pages.
    pub fetched: usize,
    /// Items whose status matched the released label.
    pub released: usize,
    /// Items published to the target this run.
    pub published: usize,
    /// Items dropped by dedup (already published, or duplicated in-batch).
    pub skipped: usize,
    /// Per-item publish failures.
    pub failures: Vec<ItemFailure>,
}

impl RunSummary {
    /// Returns true if every surviving candidate was published.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The run completed, possibly with per-item failures.
    Ok,
    /// The run failed before completing.
    Error,
}

/// The externally observable result of a run.
///
/// This is what the invoking scheduler sees: a completed run reports
/// `status: "ok"` even when individual items failed, while run-level fatal
/// failures report `status: "error"` with the error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run outcome.
    pub status: RunStatus,
    /// Counters and failures.
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Fatal error message for failed runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    /// Creates a report for a completed run.
    pub fn completed(summary: RunSummary) -> Self {
        Self {
            status: RunStatus::Ok,
            summary,
            error: None,
        }
    }

    /// Creates a report for a run that failed with a fatal error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            summary: RunSummary::default(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_report_shape() {
        let summary = RunSummary {
            fetched: 3,
            released: 2,
            published: 2,
            skipped: 0,
            failures: vec![],
        };
        let report = RunReport::completed(summary);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["fetched"], 3);
        assert_eq!(json["published"], 2);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failed_report_carries_error() {
        let report = RunReport::failed("source unavailable");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "source unavailable");
    }

    #[test]
    fn failure_uses_camel_case_item_id() {
        let failure = ItemFailure::new("feat-2", "rejected by target");
        let json = serde_json::to_value(&failure).unwrap();

        assert!(json.get("itemId").is_some());
        assert_eq!(json["reason"], "rejected by target");
    }

    #[test]
    fn clean_summary() {
        let mut summary = RunSummary::default();
        assert!(summary.is_clean());

        summary.failures.push(ItemFailure::new("x", "boom"));
        assert!(!summary.is_clean());
    }
}
