//! Shared utilities for use cases.
//!
//! Cancellation checking and cancellable, time-limited awaits.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why a guarded await did not produce a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupted {
    Cancelled,
    TimedOut(Duration),
}

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(|t| t.is_cancelled())
}

/// Await `future`, giving up when the token is cancelled or `timeout`
/// expires. Cancellation wins when both happen at once.
pub(crate) async fn guarded<F, T>(
    future: F,
    timeout: Option<Duration>,
    token: &Option<CancellationToken>,
) -> Result<T, Interrupted>
where
    F: Future<Output = T>,
{
    let timed = async {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| Interrupted::TimedOut(limit)),
            None => Ok(future.await),
        }
    };

    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(Interrupted::Cancelled),
            result = timed => result,
        },
        None => timed.await,
    }
}

/// Sleep for `duration` unless cancelled first
pub(crate) async fn sleep_cancellable(
    duration: Duration,
    token: &Option<CancellationToken>,
) -> Result<(), Interrupted> {
    guarded(tokio::time::sleep(duration), None, token).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_guarded_times_out() {
        let result = guarded(
            tokio::time::sleep(Duration::from_secs(10)),
            Some(Duration::from_secs(1)),
            &None,
        )
        .await;
        assert_eq!(result, Err(Interrupted::TimedOut(Duration::from_secs(1))));
    }

    #[tokio::test]
    async fn test_guarded_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = guarded(async { 42 }, None, &Some(token)).await;
        assert_eq!(result, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn test_guarded_passes_value_through() {
        let token = Some(CancellationToken::new());
        assert_eq!(guarded(async { 42 }, Some(Duration::from_secs(1)), &token).await, Ok(42));
        assert!(!is_cancelled(&token));
    }
}
