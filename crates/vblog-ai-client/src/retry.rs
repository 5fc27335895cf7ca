//! Retry policy for AI service calls.
//!
//! A [`RetryPolicy`] is a value: the maximum number of retries, a delay
//! function of the attempt number, and a predicate deciding which errors are
//! worth another attempt. The client wraps each whole HTTP exchange in
//! [`RetryPolicy::run`]; the exchange itself never loops.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::AiError;
use crate::metrics::record_retry;

type DelayFn = dyn Fn(u32) -> Duration + Send + Sync;
type RetryablePredicate = dyn Fn(&AiError) -> bool + Send + Sync;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default fixed backoff between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    delay: Arc<DelayFn>,
    retryable: Arc<RetryablePredicate>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("first_delay", &(self.delay)(1))
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Same delay before every retry; retries errors where [`AiError::is_retryable`].
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay: Arc::new(move |_| delay),
            retryable: Arc::new(AiError::is_retryable),
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::fixed(0, Duration::ZERO)
    }

    /// Replace the delay function. It receives the 1-based retry number.
    pub fn with_delay_fn<F>(mut self, delay: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.delay = Arc::new(delay);
        self
    }

    /// Replace the retryable-error predicate.
    pub fn with_retryable<P>(mut self, retryable: P) -> Self
    where
        P: Fn(&AiError) -> bool + Send + Sync + 'static,
    {
        self.retryable = Arc::new(retryable);
        self
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        (self.delay)(retry)
    }

    pub fn should_retry(&self, error: &AiError) -> bool {
        (self.retryable)(error)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or
    /// retries are exhausted. The last error is returned on failure.
    pub async fn run<F, Fut, T>(&self, operation: &str, op: F) -> Result<T, AiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, AiError>>,
    {
        let mut retry = 0u32;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retry < self.max_retries && self.should_retry(&e) => {
                    retry += 1;
                    let delay = self.delay_for(retry);
                    warn!(
                        operation = %operation,
                        attempt = retry,
                        delay_ms = delay.as_millis() as u64,
                        "AI request failed, retrying: {}",
                        e
                    );
                    record_retry(operation);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    debug!(
                        operation = %operation,
                        attempts = retry + 1,
                        retryable = self.should_retry(&e),
                        "AI request giving up"
                    );
                    return Err(e);
                }
            }
        }
    }
}
