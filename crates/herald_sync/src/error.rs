//! Error types for the sync engine.

use herald_store::StoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised while assembling configuration, before any I/O happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A configuration value is present but unusable.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// The configuration entry.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Errors from the upstream source. All of these are fatal for the run:
/// without a complete candidate list there is nothing safe to publish.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network failure or unexpected HTTP status.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source rejected our credentials.
    #[error("source authentication failed (HTTP {status})")]
    Auth {
        /// The HTTP status returned (401 or 403).
        status: u16,
    },

    /// The response did not have the expected shape.
    #[error("source response malformed: {0}")]
    Malformed(String),
}

/// Errors from the announcement target. These are per-item: the failed item
/// is recorded in the run summary and the run moves on.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Network failure reaching the target.
    #[error("target unavailable: {0}")]
    Unavailable(String),

    /// The target rejected our credentials.
    #[error("target authentication failed (HTTP {status})")]
    Auth {
        /// The HTTP status returned (401 or 403).
        status: u16,
    },

    /// The target rejected this post; retrying would not help.
    #[error("target rejected post (HTTP {status}): {message}")]
    Rejected {
        /// The HTTP status returned.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// A transient failure (5xx, rate limit, timeout) worth retrying.
    #[error("target transient failure: {0}")]
    Transient(String),
}

impl TargetError {
    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TargetError::Transient(_))
    }
}

/// Run-level errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration could not be assembled.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The source could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The state store could not be read or written. Fatal: publishing
    /// without durable dedup state risks duplicate posts.
    #[error("state store failure: {0}")]
    State(#[from] StoreError),

    /// Invalid state transition.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(TargetError::Transient("503".into()).is_retryable());
        assert!(!TargetError::Unavailable("connection refused".into()).is_retryable());
        assert!(!TargetError::Auth { status: 401 }.is_retryable());
        assert!(!TargetError::Rejected {
            status: 422,
            message: "title too long".into()
        }
        .is_retryable());
    }

    #[test]
    fn error_display() {
        let err = SourceError::Auth { status: 403 };
        assert_eq!(err.to_string(), "source authentication failed (HTTP 403)");

        let err = ConfigError::MissingVar("SOURCE_TOKEN");
        assert!(err.to_string().contains("SOURCE_TOKEN"));
    }

    #[test]
    fn store_error_is_fatal_sync_error() {
        let err: SyncError = StoreError::Locked.into();
        assert!(matches!(err, SyncError::State(_)));
    }
}
