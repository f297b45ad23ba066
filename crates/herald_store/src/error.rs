//! Error types for state-store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing dedup state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The journal contains an unreadable record.
    #[error("state journal corrupted: {0}")]
    Corrupted(String),

    /// Another process holds the store lock.
    #[error("state store is locked by another process")]
    Locked,
}
