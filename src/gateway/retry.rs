//! Retry with exponential backoff for idempotent requests.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

use super::GatewayResponse;

const INITIAL_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF: Duration = Duration::from_millis(2000);

/// Statuses worth another attempt on a read.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        RetryPolicy {
            max_retries,
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: MAX_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt` (0-based): doubles each time, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Run `op` until it yields a non-retryable outcome or the budget is spent.
    ///
    /// Transport errors and retryable statuses are retried. The last outcome
    /// is returned as is, so a final 503 still reaches the caller as a response.
    pub async fn run<F, Fut>(&self, mut op: F) -> Result<GatewayResponse>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<GatewayResponse>>,
    {
        let mut attempt = 0;
        loop {
            let outcome = op().await;
            let retry = match &outcome {
                Ok(response) => is_retryable_status(response.status.as_u16()),
                Err(err) => err.is_retryable(),
            };
            if !retry || attempt >= self.max_retries {
                return outcome;
            }

            let delay = self.backoff(attempt);
            match &outcome {
                Ok(response) => tracing::warn!(
                    status = response.status.as_u16(),
                    attempt = attempt + 1,
                    ?delay,
                    "retrying read"
                ),
                Err(err) => tracing::warn!(error = %err, attempt = attempt + 1, ?delay, "retrying read"),
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PasteleriaError;
    use http::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries).with_backoff(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(5);
        assert_eq!(policy.backoff(0), Duration::from_millis(200));
        assert_eq!(policy.backoff(1), Duration::from_millis(400));
        assert_eq!(policy.backoff(3), Duration::from_millis(1600));
        assert_eq!(policy.backoff(4), Duration::from_millis(2000));
        assert_eq!(policy.backoff(40), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let calls = AtomicU32::new(0);
        let response = instant(3)
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Ok(GatewayResponse::new(StatusCode::SERVICE_UNAVAILABLE, ""))
                    } else {
                        Ok(GatewayResponse::new(StatusCode::OK, "[]"))
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let outcome = instant(2)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(PasteleriaError::Transport("connection refused".into())) }
            })
            .await;
        assert!(matches!(outcome, Err(PasteleriaError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let response = instant(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(GatewayResponse::new(StatusCode::BAD_REQUEST, "bad filter")) }
            })
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
