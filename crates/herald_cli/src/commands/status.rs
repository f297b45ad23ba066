//! Status command implementation.

use herald_protocol::PublishedRecord;
use serde::Serialize;
use std::env;
use std::error::Error;

/// State-store inspection result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    /// The DSN the store was opened from.
    dsn: String,
    /// Total number of published records.
    records: usize,
    /// Most recent records, newest last.
    recent: Vec<RecordLine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordLine {
    item_id: String,
    published_at: String,
    target_post_id: Option<String>,
}

impl From<PublishedRecord> for RecordLine {
    fn from(record: PublishedRecord) -> Self {
        Self {
            item_id: record.item_id,
            published_at: record.published_at.to_rfc3339(),
            target_post_id: record.target_post_id,
        }
    }
}

/// Runs the status command.
pub fn run(limit: Option<usize>, format: &str) -> Result<(), Box<dyn Error>> {
    let dsn = env::var("STATE_BACKEND_DSN")
        .map_err(|_| "STATE_BACKEND_DSN is required for status")?;
    if dsn == "memory://" {
        return Err("memory:// keeps no durable records to inspect".into());
    }

    let store = super::open_store(&dsn)?;
    let all = store.records();
    let total = all.len();

    let shown = match limit {
        Some(limit) => all.into_iter().rev().take(limit).rev().collect(),
        None => all,
    };

    let report = StatusReport {
        dsn,
        records: total,
        recent: shown.into_iter().map(RecordLine::from).collect(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("state store: {}", report.dsn);
            println!("records:     {}", report.records);
            for line in &report.recent {
                match &line.target_post_id {
                    Some(post_id) => {
                        println!("  {}  {}  -> {}", line.published_at, line.item_id, post_id)
                    }
                    None => println!("  {}  {}", line.published_at, line.item_id),
                }
            }
        }
    }

    Ok(())
}
