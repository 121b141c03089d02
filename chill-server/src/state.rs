//! Application state

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;

use crate::auth::rate_limit::LoginLimiter;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool (sessions pinned to UTC)
    pub pool: PgPool,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Attempt counters for the login route
    pub login_limiter: LoginLimiter,
    /// Take the client IP from `X-Forwarded-For`
    pub trust_proxy: bool,
}

impl AppState {
    /// Connect, migrate and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET TIME ZONE 'UTC'").await?;
                    Ok(())
                })
            })
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            trust_proxy: config.trust_proxy,
            ..Self::with_pool(pool, config.jwt_secret.clone())
        })
    }

    /// State around an existing pool (no migrations, no trusted proxy)
    pub fn with_pool(pool: PgPool, jwt_secret: String) -> Self {
        Self {
            pool,
            jwt_secret,
            login_limiter: LoginLimiter::new(),
            trust_proxy: false,
        }
    }
}
