//! Back-office API server: reads settings from the environment (and `.env`), connects to
//! MySQL, serves the entity routes, and closes the pool on shutdown.
//!
//! Run from repo root: `cargo run -p pastelaria-server`

use pastelaria_api::{app, AppState, Catalog, MySqlSource, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pastelaria_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let catalog = Catalog::load(&settings).await?;
    let names: Vec<&str> = catalog.entities().iter().map(|e| e.name.as_str()).collect();
    tracing::info!(entities = ?names, "entity allow-list loaded");

    let source = MySqlSource::connect(&settings).await?;
    let state = AppState::new(Arc::new(source.clone()), catalog);

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    source.close().await;
    tracing::info!("database pool closed, bye");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
