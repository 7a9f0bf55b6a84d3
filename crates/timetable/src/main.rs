use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use timetable::config::TimetableConfig;
use timetable::server::create_router;
use timetable::types::AppState;

const CONFIG_ENV: &str = "TIMETABLE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/timetable.json";
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = TimetableConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::from_config(config).context("building catalog provider")?);

    tokio::spawn(sweep_idle_sessions(state.clone()));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!("Timetable server listening on {}", bind_address);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Periodically drops sessions that have been idle past the configured TTL.
async fn sweep_idle_sessions(state: Arc<AppState>) {
    let idle_ttl = Duration::from_secs(state.config.session_idle_secs);
    let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);

    loop {
        ticker.tick().await;
        let removed = state.sessions.cleanup_expired(idle_ttl);
        if removed > 0 {
            info!(
                removed,
                remaining = state.sessions.len(),
                "Evicted idle sessions"
            );
        }
    }
}
