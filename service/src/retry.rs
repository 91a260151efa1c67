use common::{BackoffStrategy, RetryPolicy};
use std::future::Future;
use std::time::Duration;

use crate::error::ModerationError;

/// Calculate the delay in milliseconds before retry number `attempt` (0-based).
pub fn calculate_backoff_delay(
    attempt: u32,
    strategy: &BackoffStrategy,
    initial_delay: u64,
    max_delay: u64,
) -> u64 {
    let delay = match strategy {
        BackoffStrategy::Fixed => initial_delay,
        BackoffStrategy::Linear => initial_delay.saturating_mul(attempt as u64 + 1),
        BackoffStrategy::Exponential => initial_delay.saturating_mul(2_u64.saturating_pow(attempt)),
    };

    delay.min(max_delay)
}

/// Runs `op` until it succeeds, fails permanently, or the policy's retries
/// are used up. The last error is returned.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ModerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ModerationError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = calculate_backoff_delay(
                    attempt,
                    &policy.backoff,
                    policy.initial_delay_ms,
                    policy.max_delay_ms,
                );
                log::warn!(
                    "Moderation attempt {} failed ({}), retrying in {}ms",
                    attempt + 1,
                    e,
                    delay
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_exponential_backoff() {
        let delay = calculate_backoff_delay(0, &BackoffStrategy::Exponential, 60, 3600);
        assert_eq!(delay, 60);

        let delay = calculate_backoff_delay(1, &BackoffStrategy::Exponential, 60, 3600);
        assert_eq!(delay, 120);

        let delay = calculate_backoff_delay(2, &BackoffStrategy::Exponential, 60, 3600);
        assert_eq!(delay, 240);

        // Test max delay cap
        let delay = calculate_backoff_delay(10, &BackoffStrategy::Exponential, 60, 3600);
        assert_eq!(delay, 3600);

        let delay = calculate_backoff_delay(200, &BackoffStrategy::Exponential, 60, 3600);
        assert_eq!(delay, 3600);
    }

    #[test]
    fn test_linear_backoff() {
        let delay = calculate_backoff_delay(0, &BackoffStrategy::Linear, 60, 3600);
        assert_eq!(delay, 60);

        let delay = calculate_backoff_delay(2, &BackoffStrategy::Linear, 60, 3600);
        assert_eq!(delay, 180);
    }

    #[test]
    fn test_fixed_backoff() {
        let delay = calculate_backoff_delay(5, &BackoffStrategy::Fixed, 60, 3600);
        assert_eq!(delay, 60);
    }

    fn quick_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: BackoffStrategy::Fixed,
            initial_delay_ms: 1,
            max_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_zero_retries_calls_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = with_retry(&quick_policy(0), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ModerationError::Timeout)
        })
        .await;

        assert!(matches!(result, Err(ModerationError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_retry(&quick_policy(1), move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ModerationError::Transport("connection reset".into()))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = with_retry(&quick_policy(3), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ModerationError::Status { status: 401, body: "unauthorized".into() })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = with_retry(&quick_policy(2), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ModerationError::Status { status: 503, body: String::new() })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
