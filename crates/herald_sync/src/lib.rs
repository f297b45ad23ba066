//! # Herald Sync
//!
//! Sync engine for Herald: polls a product-management source for released
//! items and announces each one to a changelog target, exactly once per item.
//!
//! This crate provides:
//! - Run state machine (idle → fetching → filtering → deduping → publishing)
//! - Cursor-following paginated source fetches
//! - Released-status filtering and journal-backed dedup
//! - Retry with exponential backoff for transient publish failures
//! - HTTP client abstraction with Productboard and Beamer implementations
//!
//! ## Architecture
//!
//! The engine implements a **fetch-then-publish** pipeline:
//! 1. Fetch all candidate items from the source (every page, every run)
//! 2. Keep items whose status matches the released label
//! 3. Drop items already present in the state store
//! 4. Publish survivors one at a time, recording each before the next
//!
//! ## Key Invariants
//!
//! - The state store is consulted before, and updated after, every publish
//! - A publish is recorded durably before the run advances to the next item
//! - Only transient target failures are retried
//! - One bad item never aborts the rest of the run

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod beamer;
mod config;
pub mod dedupe;
mod engine;
mod error;
pub mod filter;
mod http;
mod productboard;
mod source;
mod target;

pub use beamer::BeamerPublisher;
pub use config::{RetryConfig, SyncConfig};
pub use engine::{EngineStats, RunPlan, RunState, SyncEngine};
pub use error::{ConfigError, SourceError, SyncError, SyncResult, TargetError};
pub use http::{HttpClient, HttpError, HttpResponse, ReqwestClient};
pub use productboard::ProductboardSource;
pub use source::{ItemSource, MockSource, PagedItems};
pub use target::{MockPublisher, Publisher};
