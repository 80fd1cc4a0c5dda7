//! TokenGate Server: multi-scheme bearer token service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use tokengate_api::build_state;
use tokengate_auth::ConfigCredentialStore;
use tokengate_core::config::AppConfig;
use tokengate_core::error::AppError;
use tokengate_core::traits::{Clock, SystemClock};
use tokengate_database::TokenStores;
use tokengate_worker::CronScheduler;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TOKENGATE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TokenGate v{}", env!("CARGO_PKG_VERSION"));

    // Token stores
    tracing::info!(backend = ?config.database.backend, "Initializing token stores...");
    let stores = TokenStores::from_config(&config.database).await?;

    // Credential store and auth services
    let credentials = Arc::new(ConfigCredentialStore::from_accounts(&config.auth.accounts)?);
    tracing::info!(
        accounts = credentials.len(),
        schemes = config.auth.schemes.len(),
        "Credential store loaded"
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let worker_config = config.worker.clone();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = build_state(config, stores.clone(), credentials, clock)?;

    // Background sweeps
    let mut scheduler = if worker_config.enabled {
        let scheduler = CronScheduler::new().await?;
        scheduler
            .register_default_tasks(&state.auth, &worker_config)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background sweeps disabled");
        None
    };

    // HTTP server
    let served = tokengate_api::app::serve(state, shutdown_signal()).await;

    tracing::info!("Shutdown signal received, stopping services...");
    if let Some(scheduler) = scheduler.as_mut() {
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Scheduler shutdown failed: {}", e),
            Err(_) => tracing::warn!("Scheduler did not stop within {:?}", grace),
        }
    }
    stores.close().await;

    served?;
    tracing::info!("TokenGate server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
