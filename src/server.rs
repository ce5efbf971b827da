use std::net::SocketAddr;

use axum::{serve, Router};
use tokio::net::TcpListener;

use crate::errors::ServerError;

/// Bind `0.0.0.0:port` and serve `app` until Ctrl+C.
pub async fn run(name: &str, port: u16, app: Router) -> Result<(), ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!("{} listening on http://{}", name, addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown(name.to_string()))
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown(name: String) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::warn!("CTRL+C received, stopping {}", name);
}
