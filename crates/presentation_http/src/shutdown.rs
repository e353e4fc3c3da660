//! Graceful shutdown with a bounded drain

use std::{future::Future, io, time::Duration};

use tokio::sync::watch;
use tracing::{info, warn};

/// Resolve once `shutdown` flips to `true`
///
/// A dropped sender without a prior signal never resolves.
pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|fired| *fired).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Drive `serve` to completion, but give up draining connections
/// `drain_timeout` after `shutdown` fires
///
/// # Errors
///
/// Returns the server's own I/O error if it fails before the deadline.
pub async fn serve_with_drain_timeout<S>(
    serve: S,
    shutdown: watch::Receiver<bool>,
    drain_timeout: Duration,
) -> io::Result<()>
where
    S: Future<Output = io::Result<()>>,
{
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return result,
        () = wait_for_shutdown(shutdown) => {},
    }

    info!(timeout = ?drain_timeout, "Waiting for open connections to close");
    if let Ok(result) = tokio::time::timeout(drain_timeout, serve).await {
        result
    } else {
        warn!(timeout = ?drain_timeout, "Drain timeout elapsed, closing remaining connections");
        Ok(())
    }
}
