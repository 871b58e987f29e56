mod app;
mod cache;
mod config;
mod handlers;
mod mock_data;
mod services;
mod state;
mod storage;

use anyhow::Result;
use clap::Parser;
use journalsync_core::lookup::ConfigKey;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::Config,
    state::{open_cache, open_storage, AppState},
};

/// JournalSync - Keep a personal journal, with a weekly mood digest
#[derive(Parser, Debug)]
#[command(name = "journalsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Skip seeding the demo accounts
    #[arg(long, env = "NO_DEMO_DATA")]
    no_demo_data: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journalsync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let storage = open_storage(&config).await?;
    storage
        .put_config(ConfigKey::WeatherApi.as_str(), &config.weather_api_template)
        .await?;
    let cache = open_cache(&config).await?;

    let state = AppState::new(storage, cache, &config)?;

    // A missing config row is not fatal: greetings just go without weather.
    match state.config_cache.init().await {
        Ok(keys) => tracing::info!(keys, "Config cache loaded"),
        Err(e) => tracing::warn!(error = %e, "Config cache failed to load"),
    }

    if !cli.no_demo_data {
        mock_data::seed_demo_accounts(state.accounts.as_ref(), &state.journal).await?;
    }

    let digest = state
        .digest
        .clone()
        .spawn(config.sentiment_job_interval(), state.subscribe_shutdown());

    // Build the application router
    let app = create_app(state.clone());

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    if let Err(e) = digest.await {
        tracing::warn!(error = %e, "Sentiment digest task ended abnormally");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM) and stop background jobs.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    state.signal_shutdown();
}
