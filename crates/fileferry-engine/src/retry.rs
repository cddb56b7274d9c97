//! Bounded retry with a fixed inter-attempt delay
//!
//! Wraps a fallible operation and retries it up to the configured number of
//! attempts, sleeping a fixed delay between attempts. There is no exponential
//! backoff: the dominant failure mode is a transient file lock expected to
//! clear within seconds, so a fixed short delay recovers as fast as anything
//! else would.

use fileferry_types::{Result, RetryPolicy};
use std::future::Future;
use tracing::{info, warn};

/// Retrying wrapper around a fallible async operation
#[derive(Debug, Clone, Copy)]
pub struct Retrier {
    policy: RetryPolicy,
}

impl Retrier {
    /// Create a retrier with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run the operation, retrying on failure
    ///
    /// The operation is invoked at most `attempts` times in total. On success
    /// the result is returned immediately; once the attempts are exhausted the
    /// last attempt's error is propagated.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.policy.attempts.get();
        let delay = self.policy.delay.duration();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(attempts = attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) if attempt < attempts => {
                    warn!(
                        error = %error,
                        attempt,
                        attempts,
                        delay_secs = delay.as_secs(),
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileferry_types::{Error, RetryAttempts, RetryDelay};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy(attempts: u32, delay_secs: u64) -> RetryPolicy {
        RetryPolicy::new(
            RetryAttempts::new(attempts).unwrap(),
            RetryDelay::new(delay_secs).unwrap(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let retrier = Retrier::new(policy(5, 3));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result = retrier
            .run(|| {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Error>(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_twice_then_succeeds() {
        let retrier = Retrier::new(policy(5, 3));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result = retrier
            .run(|| {
                let calls = Arc::clone(&calls_clone);
                async move {
                    let count = calls.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(Error::io("file locked"))
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3, "exactly three invocations");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_surface_last_error() {
        let retrier = Retrier::new(policy(3, 1));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: Result<()> = retrier
            .run(|| {
                let calls = Arc::clone(&calls_clone);
                async move {
                    let count = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(Error::io(format!("attempt {count} failed")))
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3, "exactly three attempts");
        let error = result.unwrap_err();
        assert!(
            error.to_string().contains("attempt 3 failed"),
            "the final attempt's error is surfaced, got: {error}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_never_sleeps() {
        let retrier = Retrier::new(policy(1, 30));
        let start = tokio::time::Instant::now();

        let result: Result<()> = retrier.run(|| async { Err(Error::io("no luck")) }).await;

        assert!(result.is_err());
        assert_eq!(start.elapsed().as_secs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_fixed_between_attempts() {
        let retrier = Retrier::new(policy(3, 3));
        let start = tokio::time::Instant::now();

        let _result: Result<()> = retrier.run(|| async { Err(Error::io("still locked")) }).await;

        // Two sleeps of exactly three seconds each, no backoff
        assert_eq!(start.elapsed().as_secs(), 6);
    }
}
