use std::sync::Arc;

use anyhow::Context;
use golf_core::db::Database;
use golf_server::{AppState, ServerConfig, router, telemetry};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = ServerConfig::from_env()?;
    let addr = config.listen_addr()?;

    let db = Database::open(&config.database_path).with_context(|| {
        format!("failed to open database at {}", config.database_path.display())
    })?;
    let app = router(AppState::new(Arc::new(db)));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
