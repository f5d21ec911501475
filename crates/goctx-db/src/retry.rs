//! Transient store error retry with exponential backoff.
//!
//! SQLite under WAL can still report `database is locked` when a writer
//! holds the lock past the busy timeout. These resolve on their own; the
//! predicate stays narrow so genuine SQL and constraint errors are never
//! retried.

use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;

/// Configuration for retry behavior on transient store errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        // One retry after the initial attempt.
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Detect transient lock contention errors.
#[must_use]
pub fn is_transient(error: &StoreError) -> bool {
    match error {
        StoreError::LibSql(e) => {
            let msg = e.to_string();
            msg.contains("database is locked") || msg.contains("database table is locked")
        }
        _ => false,
    }
}

/// Run `op`, retrying transient failures with exponential backoff.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or immediately for
/// non-transient errors.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut delay = config.base_delay;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < config.max_attempts && is_transient(&error) => {
                tracing::warn!(attempt, %error, "transient store error, retrying");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(config.max_delay);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
