// ABOUTME: HTTP server startup and graceful shutdown
// ABOUTME: Binds the configured address and serves the router until Ctrl-C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::resources::ServerResources;
use crate::routes::build_router;

/// Panel HTTP server
pub struct PanelServer {
    resources: Arc<ServerResources>,
}

impl PanelServer {
    /// Create a server over prepared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Bind the configured host and port. Host names and IPv6 literals are
    /// resolved by the OS.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not resolve or the port cannot be bound
    pub async fn bind(&self) -> Result<TcpListener> {
        let config = &self.resources.config;
        TcpListener::bind((config.host.as_str(), config.http_port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", config.host, config.http_port))
    }

    /// Serve until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let address = listener.local_addr()?;
        let app = build_router(self.resources);

        info!("HTTP server listening on http://{address}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
