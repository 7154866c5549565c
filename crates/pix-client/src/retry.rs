//! Retry policy for PIX requests.
//!
//! A request is retried when it fails in transport (connection refused,
//! timeout) or when the server answers `429 Too Many Requests` or any `5xx`.
//! Other statuses are final. Once the retries are spent the last outcome is
//! handed back unchanged, so a persistent `503` reaches the caller as an
//! [`ApiError`](crate::PixApiError::ApiError) with the server's body.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// How often and how patiently a [`Session`](crate::Session) retries.
///
/// The delay doubles per retry: with the defaults a request is tried four
/// times, sleeping 200ms, 400ms and 800ms in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub const NEVER: Self = Self {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    /// Sleep before retry number `retry` (zero-based).
    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry))
    }

    /// Run `send` until it yields a final outcome or retries run out.
    pub(crate) async fn run<F, Fut>(
        &self,
        endpoint: &str,
        send: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut retry = 0;
        loop {
            let outcome = send().await;
            let transient = match &outcome {
                Ok(resp) if is_transient(resp.status()) => Some(resp.status().to_string()),
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            };
            let Some(reason) = transient else {
                return outcome;
            };
            if retry >= self.max_retries {
                return outcome;
            }

            let delay = self.delay(retry);
            retry += 1;
            tracing::warn!(
                endpoint,
                retry,
                max_retries = self.max_retries,
                ?delay,
                %reason,
                "retrying PIX request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Statuses worth asking again for.
pub(crate) fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delay_doubles_from_base() {
        let policy = RetryPolicy {
            max_retries: 4,
            base_delay: Duration::from_millis(50),
        };
        let delays: Vec<u128> = (0..4).map(|n| policy.delay(n).as_millis()).collect();
        assert_eq!(delays, vec![50, 100, 200, 400]);
    }

    #[test]
    fn huge_retry_index_saturates() {
        let policy = RetryPolicy::default();
        assert!(policy.delay(200) >= policy.delay(20));
    }

    #[test]
    fn transient_statuses() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_transient(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_transient(StatusCode::NOT_FOUND));
        assert!(!is_transient(StatusCode::BAD_REQUEST));
        assert!(!is_transient(StatusCode::OK));
    }

    #[tokio::test]
    async fn never_policy_sends_once_on_refused_connection() {
        let attempts = AtomicU32::new(0);
        let http = reqwest::Client::new();

        // Nothing listens on port 1.
        let result = RetryPolicy::NEVER
            .run("GET /", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                http.get("http://127.0.0.1:1/").send()
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
