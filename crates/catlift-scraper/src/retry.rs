//! Fixed-backoff retry for page fetches.
//!
//! Network failures, 429s and 5xx responses are retried after a constant
//! pause. A 404 or any other status is returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Runs `operation`, retrying retriable failures up to `max_retries` more
/// times with `backoff` between attempts. The last error is returned once
/// retries are exhausted.
///
/// With `max_retries = 1` the operation runs at most twice.
pub(crate) async fn retry_with_fixed_backoff<T, F, Fut>(
    max_retries: u32,
    backoff: Duration,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        attempt += 1;
        tracing::warn!(
            attempt,
            max_retries,
            backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "fetch failed, retrying"
        );
        tokio::time::sleep(backoff).await;
    }
}
