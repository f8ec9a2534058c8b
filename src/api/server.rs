//! Dashboard server lifecycle — bind, spawn, graceful shutdown.
//!
//! Pattern: bind the listener, spawn the axum serve loop in a
//! background tokio task, return a handle holding a oneshot shutdown
//! channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::dashboard_router;
use crate::api::types::ApiContext;
use crate::config;

/// Handle to a running dashboard server.
pub struct DashboardServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl DashboardServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("dashboard server shutdown signal sent");
        }
    }
}

/// Start the dashboard server on the fixed configured address.
pub async fn start_dashboard_server(ctx: ApiContext) -> Result<DashboardServer, String> {
    let addr: SocketAddr = config::BIND_ADDR
        .parse()
        .map_err(|e| format!("Invalid bind address '{}': {e}", config::BIND_ADDR))?;
    start_dashboard_server_on(ctx, addr).await
}

/// Start the dashboard server on a caller-supplied address.
///
/// Factored out so tests can bind an ephemeral port (`127.0.0.1:0`)
/// instead of the fixed one.
pub async fn start_dashboard_server_on(
    ctx: ApiContext,
    addr: SocketAddr,
) -> Result<DashboardServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind dashboard server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = dashboard_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("dashboard server received shutdown signal");
        };

        tracing::info!(%addr, "dashboard server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("dashboard server error: {e}");
        }

        tracing::info!("dashboard server stopped");
    });

    Ok(DashboardServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}
