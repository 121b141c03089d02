//! chill-server entry point

use std::net::SocketAddr;

use chill_server::api;
use chill_server::config::Config;
use chill_server::state::AppState;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::new(&config.log_filter);
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting chill-server (env: {})", config.environment);
    if config.trust_proxy {
        tracing::info!("Client IPs taken from X-Forwarded-For");
    }
    if config.is_development() {
        tracing::warn!("Development mode: unset secrets use placeholder values");
    }

    let state = AppState::new(&config).await?;

    // Drop idle login windows every 5 minutes
    let login_limiter = state.login_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            login_limiter.prune().await;
        }
    });

    let app = api::build_app(state, &config.cors_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("chill-server HTTP listening on {addr}");

    // ConnectInfo feeds the login limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("chill-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
