//! Process lifecycle: serving until a shutdown signal, then a bounded drain
//!
//! ```text
//! Loading ──► Serving ──(SIGINT/SIGTERM)──► Draining ──► Stopped
//! ```
//!
//! Once draining starts the listener stops accepting. In-flight requests get
//! the grace period to finish; connections still open after it are dropped.

use anyhow::Result;
use axum::Router;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// Lifecycle phase, logged at every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Loading,
    Serving,
    Draining,
    Stopped,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecyclePhase::Loading => "loading",
            LifecyclePhase::Serving => "serving",
            LifecyclePhase::Draining => "draining",
            LifecyclePhase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// How the drain finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request completed within the grace period
    Drained,
    /// The grace period elapsed and remaining connections were abandoned
    TimedOut,
}

/// Serve `app` on `listener` until `shutdown` resolves, then drain
///
/// Returns an error if the server fails while serving. On
/// [`ShutdownOutcome::TimedOut`] the accept loop is aborted; connection tasks
/// still running are dropped when the runtime shuts down.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<ShutdownOutcome>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    info!(phase = %LifecyclePhase::Serving, "accepting connections");

    tokio::select! {
        _ = shutdown => {}
        result = &mut server => {
            return match result {
                Ok(Ok(())) => Err(anyhow::anyhow!("server stopped without a shutdown request")),
                Ok(Err(e)) => Err(anyhow::anyhow!("server error: {}", e)),
                Err(e) => Err(anyhow::anyhow!("server task failed: {}", e)),
            };
        }
    }

    info!(phase = %LifecyclePhase::Draining, "shutting down, grace period {:?}", grace);
    let _ = drain_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(Ok(Ok(()))) => {
            info!(phase = %LifecyclePhase::Stopped, "shut down");
            Ok(ShutdownOutcome::Drained)
        }
        Ok(Ok(Err(e))) => Err(anyhow::anyhow!("server error during shutdown: {}", e)),
        Ok(Err(e)) => Err(anyhow::anyhow!("server task failed: {}", e)),
        Err(_) => {
            warn!(
                phase = %LifecyclePhase::Stopped,
                "in-flight requests did not finish within {:?}, closing connections", grace
            );
            server.abort();
            Ok(ShutdownOutcome::TimedOut)
        }
    }
}

/// Wait for SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl_c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    error!("failed to register SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(LifecyclePhase::Loading.to_string(), "loading");
        assert_eq!(LifecyclePhase::Serving.to_string(), "serving");
        assert_eq!(LifecyclePhase::Draining.to_string(), "draining");
        assert_eq!(LifecyclePhase::Stopped.to_string(), "stopped");
    }
}
