//! Retry with exponential backoff for transient async failures
//!
//! Used by the hosting-provider adapter for rate limits and dropped
//! connections. Subtasks are never retried here; a failed subtask is
//! recorded on its Record and retrying is the submitter's business.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first; 0 behaves like 1
    pub max_attempts: usize,
    pub initial_delay: Duration,
    /// Upper bound for the doubled delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, where `attempt` counts from 1
    pub fn backoff(&self, attempt: usize) -> Duration {
        let doublings = attempt.saturating_sub(1).min(16) as u32;
        self.initial_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
    }
}

/// Run `operation`, retrying while `is_transient` accepts the error
///
/// The last error is returned once attempts run out or a permanent error
/// is seen.
///
/// ```rust
/// use reporank::core::retry::{retry_async, RetryPolicy};
///
/// # async fn example() -> Result<String, String> {
/// let body = retry_async(
///     "GET /repos/acme/widgets",
///     &RetryPolicy::default(),
///     |_err: &String| true,
///     || async { Ok::<String, String>("{}".to_string()) },
/// )
/// .await?;
/// # Ok(body)
/// # }
/// ```
pub async fn retry_async<F, Fut, T, E, P>(
    what: &str,
    policy: &RetryPolicy,
    is_transient: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        if attempt >= attempts || !is_transient(&error) {
            return Err(error);
        }

        let delay = policy.backoff(attempt);
        log::debug!(
            "{} failed (attempt {}/{}), retrying in {:?}: {}",
            what,
            attempt,
            attempts,
            delay,
            error
        );
        tokio::time::sleep(delay).await;
    }
}
