//! Shared retry policy for C1 REST fetches (spec.md §4.1).
//!
//! Centralizes the "3 attempts, 100/200/400ms backoff" policy once, the same
//! way `k4_core::ws::client::connection_loop` centralizes WS reconnect
//! backoff once for every exchange instead of each exchange module
//! reimplementing it.

use std::time::Duration;

use tracing::warn;

/// Maximum attempts per endpoint (spec.md §4.1).
pub const MAX_ATTEMPTS: u32 = 3;

/// Base backoff: `100ms * 2^(attempt-1)` → 100, 200, 400ms.
pub fn backoff_for_attempt(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2u64.pow(attempt.saturating_sub(1)))
}

/// Runs `op` up to [`MAX_ATTEMPTS`] times. `is_retryable` decides whether a
/// given error should trigger another attempt (connection failure, timeout,
/// 5xx, 429) or be returned immediately (permanent 4xx, parse failure —
/// spec.md §4.1 "Non-retried").
pub async fn with_retry<T, E, Fut, Op, Retryable>(label: &str, mut op: Op, is_retryable: Retryable) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    Retryable: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < MAX_ATTEMPTS && is_retryable(&e) => {
                let backoff = backoff_for_attempt(attempt);
                warn!("[{label}] attempt {attempt}/{MAX_ATTEMPTS} failed, retrying in {backoff:?}");
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
