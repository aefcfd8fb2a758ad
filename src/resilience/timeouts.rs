//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap the outbound fetch (connect, headers, body) in one deadline
//! - Turn an elapsed deadline into a fetch error carrying the cause
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Dropping the inner future cancels the in-flight request

use std::future::Future;
use std::time::Duration;

use crate::fetch::types::{FetchFailure, ProxyError, ProxyResult};

/// Run `fut`, failing with a timeout error once `deadline` elapses.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> ProxyResult<T>
where
    F: Future<Output = ProxyResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProxyError::fetch(
            FetchFailure::Timeout,
            format!("request timed out after {:?}", deadline),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, ProxyError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_elapsed_deadline() {
        let result: ProxyResult<()> = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        match result {
            Err(ProxyError::Fetch { reason, cause }) => {
                assert_eq!(reason, FetchFailure::Timeout);
                assert_eq!(cause, "request timed out after 20ms");
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: ProxyResult<()> =
            with_deadline(Duration::from_secs(1), async { Err(ProxyError::MissingTarget) }).await;
        assert!(matches!(result, Err(ProxyError::MissingTarget)));
    }
}
