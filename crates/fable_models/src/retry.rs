//! Retry decorator for text-generation transports.

use async_trait::async_trait;
use fable_core::{ExchangeRequest, ExchangeResponse};
use fable_error::{FableError, FableResult};
use fable_interface::ExchangeDriver;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Backoff settings for [`RetryingDriver`].
///
/// - Initial backoff: `initial_backoff_ms`
/// - Backoff multiplier: 2x per attempt
/// - Maximum backoff: `max_delay_secs`
/// - Jitter: random variation per delay
/// - Maximum retries: `max_retries`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct RetryPolicy {
    /// First delay, in milliseconds
    initial_backoff_ms: u64,
    /// Upper bound on any delay, in seconds
    max_delay_secs: u64,
    /// Retries after the first attempt; zero disables retrying
    max_retries: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff_ms: 1000,
            max_delay_secs: 30,
            max_retries: 3,
        }
    }
}

impl RetryPolicy {
    /// A custom policy.
    pub fn new(initial_backoff_ms: u64, max_delay_secs: u64, max_retries: usize) -> Self {
        Self {
            initial_backoff_ms,
            max_delay_secs,
            max_retries,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    fn strategy(self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(self.initial_backoff_ms)
            .factor(2)
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .map(jitter)
            .take(self.max_retries)
    }
}

/// Wraps a driver and re-issues exchanges that failed transiently.
///
/// Only transport failures the error reports as retryable are retried (server
/// not running, timeouts, HTTP 408/429/5xx). A retried exchange resends the
/// same request, context included, so the conversation is unaffected.
/// Malformed replies never reach this layer: parsing happens above it.
#[derive(Debug, Clone)]
pub struct RetryingDriver<D> {
    inner: D,
    policy: RetryPolicy,
}

impl<D: ExchangeDriver> RetryingDriver<D> {
    /// Wrap `inner` with the given policy.
    pub fn new(inner: D, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped driver.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The policy in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

fn is_retryable(err: &FableError) -> bool {
    err.as_exchange().is_some_and(|e| e.is_retryable())
}

#[async_trait]
impl<D: ExchangeDriver> ExchangeDriver for RetryingDriver<D> {
    async fn exchange(&self, req: &ExchangeRequest) -> FableResult<ExchangeResponse> {
        Retry::spawn(self.policy.strategy(), || async {
            match self.inner.exchange(req).await {
                Ok(response) => Ok(response),
                Err(e) if is_retryable(&e) => {
                    warn!(
                        error = %e,
                        provider = self.inner.provider_name(),
                        "Transient error, will retry"
                    );
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_core::ConversationContext;
    use fable_error::{ExchangeError, ExchangeErrorKind};
    use std::sync::Mutex;

    /// Fails with the scripted errors, then succeeds.
    struct Flaky {
        failures: Mutex<Vec<ExchangeErrorKind>>,
        attempts: Mutex<usize>,
    }

    impl Flaky {
        fn new(failures: Vec<ExchangeErrorKind>) -> Self {
            Self {
                failures: Mutex::new(failures),
                attempts: Mutex::new(0),
            }
        }

        fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    #[async_trait]
    impl ExchangeDriver for Flaky {
        async fn exchange(&self, req: &ExchangeRequest) -> FableResult<ExchangeResponse> {
            *self.attempts.lock().unwrap() += 1;
            let next = {
                let mut failures = self.failures.lock().unwrap();
                if failures.is_empty() {
                    None
                } else {
                    Some(failures.remove(0))
                }
            };
            match next {
                Some(kind) => Err(ExchangeError::new(kind).into()),
                None => Ok(ExchangeResponse::new(
                    req.prompt.clone(),
                    ConversationContext::from_tokens(vec![1]),
                )),
            }
        }

        fn provider_name(&self) -> &'static str {
            "flaky"
        }
    }

    fn fast() -> RetryPolicy {
        RetryPolicy::new(1, 1, 3)
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let flaky = Flaky::new(vec![
            ExchangeErrorKind::ServerNotRunning("http://localhost:11434".to_string()),
            ExchangeErrorKind::Http {
                status_code: 503,
                message: "loading model".to_string(),
            },
        ]);
        let driver = RetryingDriver::new(&flaky, fast());

        let response = driver
            .exchange(&ExchangeRequest::new("m", "hello"))
            .await
            .unwrap();

        assert_eq!(response.text, "hello");
        assert_eq!(flaky.attempts(), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_not_retried() {
        let flaky = Flaky::new(vec![ExchangeErrorKind::ModelNotFound("nope".to_string())]);
        let driver = RetryingDriver::new(&flaky, fast());

        let err = driver
            .exchange(&ExchangeRequest::new("nope", "hello"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(flaky.attempts(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let flaky = Flaky::new(vec![ExchangeErrorKind::Timeout(5); 10]);
        let driver = RetryingDriver::new(&flaky, fast());

        let err = driver
            .exchange(&ExchangeRequest::new("m", "hello"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_exchange().map(|e| &e.kind),
            Some(ExchangeErrorKind::Timeout(5))
        ));
        assert_eq!(flaky.attempts(), 4);
    }

    #[tokio::test]
    async fn test_no_retry_policy() {
        let flaky = Flaky::new(vec![ExchangeErrorKind::Timeout(5)]);
        let driver = RetryingDriver::new(&flaky, RetryPolicy::none());

        assert!(driver.exchange(&ExchangeRequest::new("m", "x")).await.is_err());
        assert_eq!(flaky.attempts(), 1);
    }
}
