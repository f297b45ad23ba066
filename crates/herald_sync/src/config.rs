//! Configuration for the sync engine.

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

/// Default base URL for the Productboard API.
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://api.productboard.com";
/// Default base URL for the Beamer API.
pub const DEFAULT_TARGET_BASE_URL: &str = "https://app.getbeamer.com";
/// Default released-status label.
pub const DEFAULT_RELEASED_LABEL: &str = "Released";

/// Configuration for sync runs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Bearer token for the source API.
    pub source_token: String,
    /// Bearer token for the target API.
    pub target_token: String,
    /// Location of the durable state store (`memory://`, `file://<dir>`, or
    /// a plain directory path).
    pub state_dsn: String,
    /// Status label marking an item as released. Compared case-sensitively.
    pub released_label: String,
    /// Base URL of the source API.
    pub source_base_url: String,
    /// Base URL of the target API.
    pub target_base_url: String,
    /// Page size for source fetches.
    pub page_size: u32,
    /// Per-call HTTP timeout.
    pub request_timeout: Duration,
    /// Retry configuration for transient publish failures.
    pub retry: RetryConfig,
}

impl SyncConfig {
    /// Creates a configuration with default endpoints and retry policy.
    pub fn new(
        source_token: impl Into<String>,
        target_token: impl Into<String>,
        state_dsn: impl Into<String>,
    ) -> Self {
        Self {
            source_token: source_token.into(),
            target_token: target_token.into(),
            state_dsn: state_dsn.into(),
            released_label: DEFAULT_RELEASED_LABEL.into(),
            source_base_url: DEFAULT_SOURCE_BASE_URL.into(),
            target_base_url: DEFAULT_TARGET_BASE_URL.into(),
            page_size: 50,
            request_timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
        }
    }

    /// Builds configuration from the environment.
    ///
    /// Reads `SOURCE_TOKEN` (required), `TARGET_TOKEN` (required),
    /// `STATE_BACKEND_DSN` (required), and `RELEASED_STATUS_LABEL`
    /// (optional, default "Released"). Fails before any I/O happens.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source_token = require_env("SOURCE_TOKEN")?;
        let target_token = require_env("TARGET_TOKEN")?;
        let state_dsn = require_env("STATE_BACKEND_DSN")?;

        let mut config = Self::new(source_token, target_token, state_dsn);
        if let Ok(label) = env::var("RELEASED_STATUS_LABEL") {
            if !label.is_empty() {
                config.released_label = label;
            }
        }
        Ok(config)
    }

    /// Sets the released-status label.
    #[must_use]
    pub fn with_released_label(mut self, label: impl Into<String>) -> Self {
        self.released_label = label.into();
        self
    }

    /// Sets the source base URL.
    #[must_use]
    pub fn with_source_base_url(mut self, url: impl Into<String>) -> Self {
        self.source_base_url = url.into();
        self
    }

    /// Sets the target base URL.
    #[must_use]
    pub fn with_target_base_url(mut self, url: impl Into<String>) -> Self {
        self.target_base_url = url.into();
        self
    }

    /// Sets the source page size.
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the per-call HTTP timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of publish attempts per item.
    pub max_attempts: u32,
    /// Initial delay between attempts.
    pub initial_delay: Duration,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Whether to add jitter to delays.
    pub add_jitter: bool,
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            add_jitter: true,
        }
    }

    /// Creates a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            add_jitter: false,
        }
    }

    /// Sets the initial delay.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculates the delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_delay = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);

        let delay_secs = base_delay.min(self.max_delay.as_secs_f64());

        if self.add_jitter {
            // Add up to 25% jitter
            let jitter = delay_secs * 0.25 * time_jitter();
            Duration::from_secs_f64(delay_secs + jitter)
        } else {
            Duration::from_secs_f64(delay_secs)
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Simple deterministic "jitter" (no external RNG dependency).
fn time_jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}
