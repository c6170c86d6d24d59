use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::external::provider::ProviderError;

/// Backoff policy for rate-limited calls. Only
/// `ProviderError::RateLimited` is retried; every other failure kind
/// aborts immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    // Exponential growth keeps concurrent callers from hammering a shared
    // quota in lockstep; the caller adds jitter on top.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

#[derive(Debug, Error)]
pub enum RetryError {
    #[error("retries exhausted after {0} rate-limited attempts")]
    Exhausted(u32),

    #[error(transparent)]
    Fatal(ProviderError),
}

/// Runs `op`, retrying rate-limited failures with exponential backoff plus
/// uniform jitter. The operation is invoked at most `max_retries` times.
pub async fn call_with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(ProviderError::RateLimited) => {
                attempt += 1;
                if attempt >= policy.max_retries {
                    warn!("rate limited; giving up after {} attempts", attempt);
                    return Err(RetryError::Exhausted(attempt));
                }

                let delay =
                    policy.backoff_delay(attempt) + Duration::from_secs_f64(rand::random::<f64>());
                warn!(
                    "rate limited (attempt {}/{}); retrying in {:.2}s",
                    attempt,
                    policy.max_retries,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(RetryError::Fatal(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn failing_then_ok(failures: u32) -> (Arc<AtomicU32>, impl FnMut() -> CallFuture) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let op = move || -> CallFuture {
            let counter = counter.clone();
            Box::pin(async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    Err(ProviderError::RateLimited)
                } else {
                    Ok("generated text".to_string())
                }
            })
        };
        (calls, op)
    }

    type CallFuture =
        std::pin::Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send>>;

    #[tokio::test]
    async fn immediate_success_skips_backoff() {
        let (calls, op) = failing_then_ok(0);

        let start = tokio::time::Instant::now();
        let result = call_with_retry(RetryPolicy::default(), op).await.unwrap();

        assert_eq!(result, "generated text");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_rate_limits_with_growing_delays() {
        let (calls, op) = failing_then_ok(3);

        let start = tokio::time::Instant::now();
        let result = call_with_retry(RetryPolicy::default(), op).await.unwrap();

        assert_eq!(result, "generated text");
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        // three sleeps of 2s, 4s and 8s, each with under a second of jitter
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(14), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(17), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_rate_limit_exhausts_after_max_attempts() {
        let (calls, op) = failing_then_ok(u32::MAX);

        let start = tokio::time::Instant::now();
        let result = call_with_retry(RetryPolicy::default(), op).await;

        assert!(matches!(result, Err(RetryError::Exhausted(5))));
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        // four sleeps: 2s + 4s + 8s + 16s plus jitter; no sleep after the
        // final attempt
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(30), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(34), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_failure_aborts_without_sleeping() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let start = tokio::time::Instant::now();
        let result: Result<String, _> = call_with_retry(RetryPolicy::default(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::BadResponse("boom".into()))
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(RetryError::Fatal(ProviderError::BadResponse(_)))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_policy_bounds_attempts() {
        let (calls, op) = failing_then_ok(u32::MAX);
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
        };

        let result = call_with_retry(policy, op).await;

        assert!(matches!(result, Err(RetryError::Exhausted(2))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
