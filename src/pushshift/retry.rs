// Bounded retry for rate-limited (429) search requests.
//
// The search API answers bursts with HTTP 429. A request that gets one is
// retried with exponential backoff and jitter, up to `max_retries` times,
// after which the run fails with `FetchError::RetriesExhausted`. Nothing
// else is retried here: connection failures are the pipeline's call.

use std::time::Duration;

use tracing::warn;

use super::error::FetchError;

/// Default number of retries after the first 429.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default first backoff delay (doubles each retry).
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(3);

/// Cap on a single backoff delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// How many times and how patiently to retry a 429.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: DEFAULT_BASE_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// No waiting between retries. Used by tests that hit a local mock server.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_backoff: Duration::ZERO,
        }
    }

    /// Backoff before retry number `attempt` (1-based): base * 2^(attempt-1),
    /// capped at `MAX_BACKOFF`. Jitter is applied separately.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_backoff
            .saturating_mul(1u32 << shift)
            .min(MAX_BACKOFF)
    }
}

/// Scale a delay by a factor in 0.75..1.25 so back-to-back runs don't retry
/// in lockstep. The nanosecond component of the clock is enough variation.
fn jitter(delay: Duration) -> Duration {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let jitter_factor = 0.75 + (nanos % 500) as f64 / 1000.0;
    Duration::from_secs_f64(delay.as_secs_f64() * jitter_factor)
}

/// Retry an async operation while it keeps failing with a 429.
///
/// Returns the first success, the first non-429 error, or
/// `RetriesExhausted` once `1 + max_retries` attempts have all been
/// rate limited.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, FetchError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limit() => {
                if attempt >= policy.max_retries {
                    return Err(FetchError::RetriesExhausted {
                        attempts: attempt + 1,
                    });
                }

                attempt += 1;
                let delay = jitter(policy.backoff_for(attempt));

                warn!(
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    backoff_secs = delay.as_secs_f64(),
                    "Rate limited (429), retrying in {:.1}s (attempt {}/{})",
                    delay.as_secs_f64(),
                    attempt,
                    policy.max_retries,
                );

                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    // ── RetryPolicy ─────────────────────────────────────────────────

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.base_backoff, Duration::from_secs(3));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::from_secs(3));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(6));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(12));
        assert_eq!(policy.backoff_for(5), Duration::from_secs(48));
        assert_eq!(policy.backoff_for(6), MAX_BACKOFF);
        assert_eq!(policy.backoff_for(40), MAX_BACKOFF);
    }

    #[test]
    fn test_immediate_policy_never_waits() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.backoff_for(1), Duration::ZERO);
        assert_eq!(policy.backoff_for(3), Duration::ZERO);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let base = Duration::from_secs(4);
        for _ in 0..20 {
            let j = jitter(base);
            assert!(j >= Duration::from_secs(3), "jitter too small: {:?}", j);
            assert!(j <= Duration::from_secs(5), "jitter too large: {:?}", j);
        }
    }

    // ── with_retry — success cases ──────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_succeeds_immediately() {
        let call_count = AtomicU32::new(0);

        let result = with_retry(&RetryPolicy::default(), || {
            call_count.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, FetchError>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_retries_on_429_then_succeeds() {
        let call_count = AtomicU32::new(0);

        let result = with_retry(&RetryPolicy::default(), || {
            let attempt = call_count.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(FetchError::RateLimited)
                } else {
                    Ok(99)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_sleeps_between_attempts() {
        let call_count = AtomicU32::new(0);
        let start = Instant::now();

        let _ = with_retry(&RetryPolicy::default(), || {
            let attempt = call_count.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(FetchError::RateLimited)
                } else {
                    Ok(())
                }
            }
        })
        .await;

        // One backoff of 3s with jitter in 0.75..1.25
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(2250),
            "expected a ~3s backoff, got {:?}",
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_succeeds_on_last_attempt() {
        let call_count = AtomicU32::new(0);

        let result = with_retry(&RetryPolicy::default(), || {
            let attempt = call_count.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 5 {
                    Err(FetchError::RateLimited)
                } else {
                    Ok("recovered")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(call_count.load(Ordering::SeqCst), 6);
    }

    // ── with_retry — error cases ────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_exhausts_retries_on_persistent_429() {
        let call_count = AtomicU32::new(0);

        let result: Result<i32, FetchError> = with_retry(&RetryPolicy::default(), || {
            call_count.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::RateLimited) }
        })
        .await;

        match result {
            Err(FetchError::RetriesExhausted { attempts }) => assert_eq!(attempts, 6),
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
        // 1 initial + 5 retries
        assert_eq!(call_count.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_zero_retries_fails_after_one_attempt() {
        let call_count = AtomicU32::new(0);

        let result: Result<i32, FetchError> = with_retry(&RetryPolicy::immediate(0), || {
            call_count.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::RateLimited) }
        })
        .await;

        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted { attempts: 1 })
        ));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_passes_through_other_errors() {
        for err in [
            FetchError::Connection("connection refused".into()),
            FetchError::Status { status: 500 },
            FetchError::Decode("EOF".into()),
        ] {
            let call_count = AtomicU32::new(0);
            let expected = err.to_string();
            let err = std::sync::Mutex::new(Some(err));

            let result: Result<i32, FetchError> = with_retry(&RetryPolicy::default(), || {
                call_count.fetch_add(1, Ordering::SeqCst);
                let e = err.lock().unwrap().take().unwrap();
                async move { Err(e) }
            })
            .await;

            assert_eq!(result.unwrap_err().to_string(), expected);
            assert_eq!(
                call_count.load(Ordering::SeqCst),
                1,
                "'{}' should not trigger a retry",
                expected
            );
        }
    }
}
