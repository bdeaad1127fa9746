//! Listener setup and graceful shutdown.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::{ServerConfig, APP_NAME};
use crate::routes::build_router;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind `config.bind` and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    let addr = listener.local_addr()?;

    let app = build_router(&config);
    tracing::info!(
        addr = %addr,
        static_dir = %config.static_dir.display(),
        max_upload_mb = config.max_upload_mb,
        "{APP_NAME} listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("{APP_NAME} stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler, run until the process is killed
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
