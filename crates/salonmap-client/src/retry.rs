//! Retry with exponential back-off and jitter for backend requests.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (timeouts, connect failures, 429, 5xx). Everything else is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`ClientError::TimedOut`] and connect failures.
/// - HTTP 429 and 5xx responses.
///
/// **Not retriable:**
/// - [`ClientError::NotFound`] and other 4xx statuses.
/// - [`ClientError::Deserialize`] / [`ClientError::InvalidShape`]: the same
///   body would come back again.
/// - [`ClientError::InvalidBaseUrl`].
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::TimedOut { .. } => true,
        ClientError::Http(e) => e.is_connect() || e.is_timeout(),
        ClientError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidShape { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// Wait before retry number `attempt` (1-based).
///
/// A `Retry-After` hint from the backend wins over the computed back-off.
/// Otherwise the wait is `backoff_base_ms * 2^(attempt-1)` with ±25 % jitter.
/// Both are capped at 30 s.
fn backoff_delay(err: &ClientError, attempt: u32, backoff_base_ms: u64) -> Duration {
    let cap = Duration::from_millis(MAX_DELAY_MS);
    if let ClientError::UnexpectedStatus {
        retry_after: Some(hint),
        ..
    } = err
    {
        return (*hint).min(cap);
    }
    let computed = backoff_base_ms
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed as f64 * rand::random_range(0.75..1.25)) as u64;
    Duration::from_millis(jittered).min(cap)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors, sleeping [`backoff_delay`] between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };
        attempt += 1;
        let delay = backoff_delay(&err, attempt, backoff_base_ms);
        tracing::warn!(
            url = err.url().unwrap_or("-"),
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "backend request failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn status(code: u16) -> ClientError {
        ClientError::UnexpectedStatus {
            status: code,
            url: "http://backend/saloons/map".to_owned(),
            body: String::new(),
            retry_after: None,
        }
    }

    #[test]
    fn server_errors_and_429_are_retriable() {
        assert!(is_retriable(&status(500)));
        assert!(is_retriable(&status(503)));
        assert!(is_retriable(&status(429)));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&status(400)));
        assert!(!is_retriable(&ClientError::NotFound {
            url: "http://backend/x".to_owned()
        }));
        assert!(!is_retriable(&ClientError::invalid_shape("salons", "not an array")));
    }

    #[test]
    fn timeouts_are_retriable() {
        assert!(is_retriable(&ClientError::TimedOut {
            url: "http://backend/saloons/map".to_owned()
        }));
    }

    #[test]
    fn retry_after_hint_overrides_backoff() {
        let err = ClientError::UnexpectedStatus {
            status: 429,
            url: "http://backend/saloons".to_owned(),
            body: String::new(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(backoff_delay(&err, 1, 10_000), Duration::from_secs(2));
    }

    #[test]
    fn retry_after_hint_is_capped() {
        let err = ClientError::UnexpectedStatus {
            status: 503,
            url: "http://backend/saloons".to_owned(),
            body: String::new(),
            retry_after: Some(Duration::from_secs(3600)),
        };
        assert_eq!(backoff_delay(&err, 1, 100), Duration::from_secs(30));
    }

    #[test]
    fn computed_backoff_doubles_within_jitter() {
        let err = status(500);
        for (attempt, base) in [(1, 400u64), (2, 800), (3, 1600)] {
            let delay = backoff_delay(&err, attempt, 400).as_millis();
            let (lo, hi) = (u128::from(base) * 3 / 4, u128::from(base) * 5 / 4);
            assert!((lo..=hi).contains(&delay), "attempt {attempt}: {delay} ms");
        }
    }

    #[tokio::test]
    async fn retries_transient_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(status(502))
                } else {
                    Ok(7u32)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status(500))
            }
        })
        .await;
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatus { status: 500, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "1 initial + 2 retries");
    }

    #[tokio::test]
    async fn does_not_retry_non_transient_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status(404))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
