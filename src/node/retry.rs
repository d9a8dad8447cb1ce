//! Backoff for node requests.
//!
//! Only transport failures (connection refused, timeouts) are retried. An
//! HTTP error status is an answer from the node and is returned as-is.
//! Requests that change node state go through [`retry_unsent`], which only
//! retries when the connection was never made.

use std::future::Future;
use std::time::Duration;
use crate::config::RetryConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, no backoff.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero-based): base, 2x base, 4x base...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        RetryPolicy {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

/// Send a request built by `f`, retrying transport errors per `policy`.
pub(crate) async fn retry_send<F, Fut>(
    policy: &RetryPolicy,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    retry_send_when(policy, |_| true, f).await
}

/// Send a non-idempotent request built by `f`.
///
/// A timeout or a dropped connection may hit after the node has already
/// accepted the request, so only connect failures are retried.
pub(crate) async fn retry_unsent<F, Fut>(
    policy: &RetryPolicy,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    retry_send_when(policy, reqwest::Error::is_connect, f).await
}

async fn retry_send_when<F, Fut, P>(
    policy: &RetryPolicy,
    retryable: P,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    P: Fn(&reqwest::Error) -> bool,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < policy.max_retries && retryable(&e) => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    "Node request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
