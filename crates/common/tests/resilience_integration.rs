//! Integration tests for resilience module
//!
//! Exercises capability deadlines the way the pipeline uses them: a slow
//! collaborator must surface as a classified, retryable timeout.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use piiveil_common::error::{CommonError, ErrorClassification};
use piiveil_common::resilience::{with_deadline, with_timeout};

/// Validates that a slow capability is cut off and its side effect never
/// completes.
#[tokio::test]
async fn slow_capability_is_cut_off() {
    let completed = Arc::new(AtomicU32::new(0));
    let flag = completed.clone();

    let result = with_timeout("ner.recognize", Duration::from_millis(20), async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        flag.fetch_add(1, Ordering::SeqCst);
    })
    .await;

    let err = result.unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("ner.recognize"));
    assert_eq!(completed.load(Ordering::SeqCst), 0);
}

/// Validates that `with_deadline` returns the inner success untouched.
#[tokio::test]
async fn with_deadline_passes_through_success() {
    let value: Result<&str, CommonError> =
        with_deadline("advisor.advise", Duration::from_millis(200), async { Ok("MASK") }).await;
    assert_eq!(value.unwrap(), "MASK");
}

/// Validates that a timeout converts into the caller's error type.
#[tokio::test]
async fn with_deadline_converts_timeout_into_caller_error() {
    #[derive(Debug)]
    struct CallerError(String);

    impl From<CommonError> for CallerError {
        fn from(err: CommonError) -> Self {
            Self(err.error_type_name().to_string())
        }
    }

    let result: Result<(), CallerError> =
        with_deadline("advisor.advise", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(())
        })
        .await;

    assert_eq!(result.unwrap_err().0, "timeout");
}
