//! Exponential backoff around fallible adapter calls.

use crate::{JitterSource, RetryConfig};
use gatekeeper_core::ShutdownSignal;
use gatekeeper_error::{AdapterError, AdapterErrorKind, AdapterResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// Result of a retried operation together with the number of attempts it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempted<T> {
    /// Final result. Exhaustion is reported as `RetryExhausted`.
    pub result: AdapterResult<T>,
    /// Number of times the operation was invoked.
    pub attempts: u32,
}

/// Retry loop with exponential backoff and relative jitter.
///
/// Attempt 1 runs immediately. After a retryable failure the policy sleeps for
/// `min(max_delay, base_delay * multiplier^(attempt - 1))` scaled by a random
/// factor in `[1 - jitter_fraction, 1 + jitter_fraction]`. Non-retryable errors
/// are returned as-is after a single call.
///
/// The caller decides retryability per operation, so the same policy serves
/// fetch, draft and post with different predicates.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    jitter: Arc<JitterSource>,
}

impl RetryPolicy {
    /// Create a retry policy.
    pub fn new(config: RetryConfig, jitter: Arc<JitterSource>) -> Self {
        Self { config, jitter }
    }

    /// The configuration this policy runs with.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Same policy with a different attempt budget.
    pub fn with_max_attempts(&self, max_attempts: u32) -> Self {
        Self {
            config: RetryConfig {
                max_attempts,
                ..self.config.clone()
            },
            jitter: Arc::clone(&self.jitter),
        }
    }

    /// Jittered delay after failed attempt number `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.config
            .base_backoff(attempt)
            .mul_f64(self.jitter.factor(self.config.jitter_fraction))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent.
    ///
    /// `operation` receives the 1-based attempt number. Every retry first
    /// checks `shutdown`; once it has fired, the run stops with
    /// `ShutdownRequested` without another attempt. An attempt that is
    /// already running is never cancelled.
    pub async fn run<T, F, Fut, P>(
        &self,
        mut operation: F,
        is_retryable: P,
        shutdown: &ShutdownSignal,
    ) -> Attempted<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = AdapterResult<T>>,
        P: Fn(AdapterErrorKind) -> bool,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let strategy = (1..max_attempts).map(|attempt| self.backoff(attempt));
        let mut attempts = 0;

        let outcome = Retry::spawn(strategy, || {
            let pending = if attempts > 0 && shutdown.is_triggered() {
                None
            } else {
                attempts += 1;
                Some(operation(attempts))
            };
            let attempt = attempts;
            let is_retryable = &is_retryable;

            async move {
                let Some(pending) = pending else {
                    debug!(attempt, "Shutdown requested, not retrying");
                    return Err(RetryError::Permanent(AdapterError::new(
                        AdapterErrorKind::ShutdownRequested,
                        "shutdown requested during backoff",
                    )));
                };
                match pending.await {
                    Ok(value) => {
                        if attempt > 1 {
                            debug!(attempt, "Operation succeeded after retry");
                        }
                        Ok(value)
                    }
                    Err(e) if is_retryable(e.kind()) => {
                        warn!(attempt, max_attempts, kind = %e.kind(), "Attempt failed, backing off");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        debug!(attempt, kind = %e.kind(), "Error is not retryable");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        let result = match outcome {
            Err(e)
                if e.kind() != AdapterErrorKind::ShutdownRequested && is_retryable(e.kind()) =>
            {
                warn!(attempts, kind = %e.kind(), "Retry attempts exhausted");
                Err(AdapterError::new(
                    AdapterErrorKind::RetryExhausted,
                    format!(
                        "gave up after {} attempts, last error: {}: {}",
                        attempts,
                        e.kind(),
                        e.message
                    ),
                ))
            }
            other => other,
        };

        Attempted { result, attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(
            RetryConfig {
                max_attempts,
                base_delay_ms: 100,
                multiplier: 2.0,
                max_delay_ms: 1000,
                jitter_fraction: 0.5,
            },
            Arc::new(JitterSource::seeded(11)),
        )
    }

    #[test]
    fn test_backoff_within_jitter_band() {
        let policy = policy(5);
        for attempt in 1..=5 {
            let base = policy.config().base_backoff(attempt);
            let delay = policy.backoff(attempt);
            assert!(delay >= base.mul_f64(0.5) && delay <= base.mul_f64(1.5));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_still_runs_once() {
        let policy = policy(0);
        let attempted = policy
            .run(
                |_| async { Err::<(), _>(AdapterError::new(AdapterErrorKind::NetworkError, "down")) },
                |k| k.is_transient(),
                &ShutdownSignal::never(),
            )
            .await;
        assert_eq!(attempted.attempts, 1);
        assert_eq!(
            attempted.result.unwrap_err().kind(),
            AdapterErrorKind::RetryExhausted
        );
    }

    #[test]
    fn test_with_max_attempts_keeps_delays() {
        let base = policy(3);
        let more = base.with_max_attempts(7);
        assert_eq!(more.config().max_attempts, 7);
        assert_eq!(more.config().base_delay_ms, 100);
    }
}
