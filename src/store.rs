//! # Store Plumbing
//!
//! Shared pieces of the persistence seam: the error type every
//! repository trait returns, and the timeout wrapper services use to
//! bound each store call.
//!
//! Repositories live next to their models (one trait plus an in-memory
//! implementation per entity). Lookups return `Ok(None)` when no record
//! matches; `StoreError` is reserved for actual storage failures.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Upper bound on any single store operation.
pub const STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the field name.
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),

    /// The operation did not finish within [`STATEMENT_TIMEOUT`].
    #[error("store operation timed out")]
    Timeout,

    /// Any other storage failure
    #[error("store failure: {0}")]
    Internal(String),
}

/// Run a store operation with the statement timeout applied.
///
/// Every repository call made by a service goes through here, so a
/// stalled store surfaces as [`StoreError::Timeout`] instead of hanging
/// the request.
pub async fn bounded<T, F>(op: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(STATEMENT_TIMEOUT, op).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_result() {
        let ok = bounded(async { Ok(7usize) }).await;
        assert_eq!(ok, Ok(7));

        let err: StoreResult<usize> =
            bounded(async { Err(StoreError::Internal("boom".to_string())) }).await;
        assert_eq!(err, Err(StoreError::Internal("boom".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_stalled_operation() {
        let result: StoreResult<()> = bounded(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        assert_eq!(result, Err(StoreError::Timeout));
    }

    #[test]
    fn test_duplicate_names_the_field() {
        let err = StoreError::Duplicate("email");
        assert_eq!(err.to_string(), "duplicate value for email");
    }
}
