//! Login throttling: a fixed window of attempts per client IP
//!
//! The client is the TCP peer. `X-Forwarded-For` is only honoured when the
//! server is configured to run behind a trusted proxy (`TRUST_PROXY`);
//! otherwise any client could pick a fresh address per request.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use shared::error::AppError;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Login attempts allowed per IP and window
pub const LOGIN_MAX_ATTEMPTS: u32 = 5;
/// Length of one login window
pub const LOGIN_WINDOW: Duration = Duration::from_secs(60);
/// Windows idle for this long are dropped by [`LoginLimiter::prune`]
const STALE_AFTER: Duration = Duration::from_secs(300);

struct Window {
    attempts: u32,
    opened: Instant,
}

/// Attempt counters keyed by client IP
#[derive(Clone, Default)]
pub struct LoginLimiter {
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl LoginLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt; `false` once the budget of the current window is spent
    pub async fn try_acquire(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let window = windows.entry(ip).or_insert(Window {
            attempts: 0,
            opened: now,
        });

        if now.duration_since(window.opened) >= LOGIN_WINDOW {
            *window = Window {
                attempts: 0,
                opened: now,
            };
        }
        window.attempts = window.attempts.saturating_add(1);
        window.attempts <= LOGIN_MAX_ATTEMPTS
    }

    pub async fn prune(&self) {
        let now = Instant::now();
        self.windows
            .lock()
            .await
            .retain(|_, window| now.duration_since(window.opened) < STALE_AFTER);
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// First hop of `X-Forwarded-For`, if it is a valid IP
fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Address the limiter charges for `request`.
///
/// Requests without connection info share the unspecified address.
pub fn client_ip(request: &Request, trust_proxy: bool) -> IpAddr {
    if trust_proxy && let Some(ip) = forwarded_for(request.headers()) {
        return ip;
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware for the login route
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request, state.trust_proxy);
    if !state.login_limiter.try_acquire(ip).await {
        tracing::warn!(%ip, "Login rate limit exceeded");
        return AppError::too_many_requests().into_response();
    }
    next.run(request).await
}
