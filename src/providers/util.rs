use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const MAX_DELAY_MS: u64 = 8_000;

/// Runs `operation` up to `retries + 1` times. The pause starts at
/// `delay_ms` and doubles after each failure, capped at eight seconds.
/// Returns the first success or the last error.
pub async fn with_retry<F, Fut, T>(mut operation: F, retries: usize, delay_ms: u64) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = delay_ms;
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if attempt >= retries => return Err(err),
            Err(err) => {
                attempt += 1;
                debug!(attempt, retries, delay_ms = delay, error = %err, "Retrying");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = delay.saturating_mul(2).min(MAX_DELAY_MS);
            }
        }
    }
}
