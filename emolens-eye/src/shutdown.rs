//! When to end a run: a time limit, an interrupt, or whichever comes first

use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::time;
use tracing::{error, info};

/// Why a run was asked to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Elapsed,
    Interrupted,
}

/// Resolve once `limit` has passed or `interrupt` fires.
///
/// An `interrupt` that fails (the signal handler could not be installed) is
/// logged and stops counting as a stop request. Without a `limit` the
/// returned future then never resolves.
pub async fn wait_for_stop<F>(limit: Option<Duration>, interrupt: F) -> StopReason
where
    F: Future<Output = io::Result<()>>,
{
    let interrupted = async {
        match interrupt.await {
            Ok(()) => StopReason::Interrupted,
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending().await
            }
        }
    };

    let reason = match limit {
        Some(limit) => tokio::select! {
            _ = time::sleep(limit) => StopReason::Elapsed,
            reason = interrupted => reason,
        },
        None => interrupted.await,
    };
    info!("Stopping run: {:?}", reason);
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn broken_handler() -> impl Future<Output = io::Result<()>> {
        async { Err(io::Error::new(io::ErrorKind::Other, "no signal driver")) }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_stops() {
        let reason = wait_for_stop(Some(Duration::from_secs(60)), async { Ok(()) }).await;
        assert_eq!(reason, StopReason::Interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_elapses() {
        let start = Instant::now();
        let reason = wait_for_stop(
            Some(Duration::from_secs(5)),
            std::future::pending::<io::Result<()>>(),
        )
        .await;
        assert_eq!(reason, StopReason::Elapsed);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_handler_waits_for_limit() {
        let start = Instant::now();
        let reason = wait_for_stop(Some(Duration::from_secs(5)), broken_handler()).await;
        assert_eq!(reason, StopReason::Elapsed);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_handler_without_limit_never_stops() {
        let outcome = time::timeout(
            Duration::from_secs(3600),
            wait_for_stop(None, broken_handler()),
        )
        .await;
        assert!(outcome.is_err());
    }
}
