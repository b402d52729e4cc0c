use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{CommonError, CommonResult};

/// Run `future` with a deadline.
///
/// Returns `CommonError::Timeout` tagged with `operation` when the
/// deadline elapses first. A zero `limit` disables the deadline.
pub async fn with_timeout<F, T>(operation: &str, limit: Duration, future: F) -> CommonResult<T>
where
    F: Future<Output = T>,
{
    if limit.is_zero() {
        return Ok(future.await);
    }

    match tokio::time::timeout(limit, future).await {
        Ok(value) => Ok(value),
        Err(_) => {
            debug!(operation, limit_ms = limit.as_millis() as u64, "deadline elapsed");
            Err(CommonError::timeout(operation, limit))
        }
    }
}

/// Run a fallible `future` with a deadline, flattening both failure modes.
///
/// The inner error is converted into the caller's error type; a timeout is
/// converted from `CommonError`.
pub async fn with_deadline<F, T, E>(operation: &str, limit: Duration, future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<CommonError>,
{
    with_timeout(operation, limit, future).await.map_err(E::from)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClassification;

    #[tokio::test]
    async fn completes_before_deadline() {
        let value = with_timeout("fast", Duration::from_millis(200), async { 7 }).await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn elapsed_deadline_maps_to_timeout() {
        let result = with_timeout("slow", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, CommonError::Timeout { ref operation, .. } if operation == "slow"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn zero_limit_disables_deadline() {
        let value = with_timeout("unbounded", Duration::ZERO, async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            "done"
        })
        .await;
        assert_eq!(value.unwrap(), "done");
    }

    #[tokio::test]
    async fn with_deadline_propagates_inner_error() {
        let result: Result<(), CommonError> =
            with_deadline("inner", Duration::from_millis(100), async {
                Err(CommonError::backend("advisor", "boom", false))
            })
            .await;
        assert!(matches!(result, Err(CommonError::Backend { .. })));
    }
}
