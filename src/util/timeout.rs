//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::SwarmError;

/// Wrap a future with a timeout.
///
/// Dropping a run on timeout discards its in-flight turn as a whole; the
/// caller keeps whatever it already received.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, SwarmError>>,
) -> Result<T, SwarmError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(SwarmError::Timeout(duration.as_millis() as u64)),
    }
}
