mod app;
mod auth;
mod bootstrap;
mod decision;
mod error;
mod health;

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Result;
use fyndy_core::config::{AppConfig, LoadOptions};
use tokio::sync::watch;

fn init_logging(config: &AppConfig) {
    use fyndy_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = bootstrap::load_config(LoadOptions::default())?;
    init_logging(&config);

    let application = bootstrap::bootstrap_with_config(config);
    let address = application.config.bind_target();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "Fyndy API running on port {}",
        application.config.server.port
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(error) = wait_for_shutdown().await {
            tracing::error!(
                event_name = "system.server.signal_error",
                correlation_id = "shutdown",
                error = %error,
                "failed to listen for shutdown signal"
            );
        }
        let _ = shutdown_tx.send(true);
    });

    let serve = axum::serve(listener, app::router(application.state))
        .with_graceful_shutdown(signalled(shutdown_rx.clone()))
        .into_future();
    let drain_deadline = Duration::from_secs(application.config.server.graceful_shutdown_secs);

    tokio::select! {
        result = serve => result?,
        () = drain_expired(shutdown_rx, drain_deadline) => {
            tracing::warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                graceful_shutdown_secs = drain_deadline.as_secs(),
                "in-flight requests did not drain before the deadline"
            );
        }
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "fyndy-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

async fn signalled(mut shutdown_rx: watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

async fn drain_expired(shutdown_rx: watch::Receiver<bool>, deadline: Duration) {
    signalled(shutdown_rx).await;
    tokio::time::sleep(deadline).await;
}
