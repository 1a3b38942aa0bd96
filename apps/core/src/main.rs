// EmoTwin Backend Entry Point
// Sentiment labelling, scripted replies and the sample log behind one HTTP API.

mod api;
mod brain;
mod config;
mod database;
mod error;
mod fs_manager;
mod models;

#[cfg(test)]
mod tests;

use anyhow::Context;
use config::{AppConfig, LogFormat};
use std::net::{Ipv4Addr, SocketAddr};
use tracing::{error, info};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                env!("CARGO_PKG_NAME").to_string(),
                std::io::stdout,
            ))
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received, draining requests");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in deployment.
    dotenv::dotenv().ok();
    init_tracing(LogFormat::from_env());

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!(
        port = config.port,
        classifier = ?config.classifier,
        neutral_score = ?config.neutral_score,
        db = %config.db_path.display(),
        "Starting EmoTwin"
    );

    let state = api::AppState::from_config(&config)
        .await
        .context("Failed to initialize application state")?;
    let store = state.store.clone();

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    info!("EmoTwin stopped");
    Ok(())
}
