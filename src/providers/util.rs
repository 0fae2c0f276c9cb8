use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often and how far apart failed requests are retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 2,
            delay: Duration::from_millis(500),
        }
    }
}

/// Whether a failed request is worth another attempt.
///
/// Only transport failures qualify; an HTTP error status is an answer.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Runs `operation` until it succeeds, fails permanently or runs out of retries.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    policy: RetryPolicy,
) -> Result<T, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if attempt <= policy.retries && is_transient(&err) => {
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt,
                    policy.retries + 1,
                    err
                );
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
