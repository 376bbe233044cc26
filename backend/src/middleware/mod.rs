//! General-purpose middleware for the site.
//!
//! This module contains the login attempt limiter, a fixed-window counter per
//! client IP, and the helper that resolves the client IP from the socket
//! address or, behind a trusted proxy, from `X-Forwarded-For`.

use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tokio::sync::Mutex;
use tower_sessions::Session;
use tracing::{error, warn};

use crate::auth::middleware::LOGIN_PATH;
use crate::state::AppState;
use crate::views::set_flash;

/// Flash text for a refused attempt, naming the window in whole minutes.
pub fn too_many_attempts(window: Duration) -> String {
    let minutes = window.as_secs().div_ceil(60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Too many login attempts. Please try again in {minutes} {unit}.")
}

#[derive(Debug, Clone, Copy)]
struct AttemptWindow {
    started: Instant,
    attempts: u32,
}

pub struct LoginRateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, AttemptWindow>>,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Records an attempt from `ip`; `false` once the window's budget is spent.
    pub async fn allow(&self, ip: IpAddr) -> bool {
        self.allow_at(ip, Instant::now()).await
    }

    async fn allow_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut lock = self.windows.lock().await;
        lock.retain(|_, w| now.duration_since(w.started) < self.window);

        let window = lock.entry(ip).or_insert(AttemptWindow {
            started: now,
            attempts: 0,
        });
        if window.attempts >= self.max_attempts {
            return false;
        }
        window.attempts += 1;
        true
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() || first.len() > 64 {
        return None;
    }
    first.parse().ok()
}

pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        if let Some(ip) = forwarded_for(headers) {
            return ip;
        }
    }
    peer.ip()
}

pub async fn limit_login_attempts(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    session: Session,
    req: Request,
    next: Next,
) -> Response {
    if req.method() != Method::POST || req.uri().path() != LOGIN_PATH {
        return next.run(req).await;
    }

    let ip = client_ip(req.headers(), peer, state.config.trust_proxy);
    if state.login_limiter.allow(ip).await {
        return next.run(req).await;
    }

    warn!(%ip, "Login rate limit exceeded");
    if let Err(err) = set_flash(&session, too_many_attempts(state.config.login_window)).await {
        error!(error = %err, "Could not store rate-limit flash message");
    }
    Redirect::to(LOGIN_PATH).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[tokio::test]
    async fn fifth_attempt_passes_and_sixth_is_refused() {
        let limiter = LoginRateLimiter::new(5, Duration::from_secs(900));
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.allow_at(ip(1), now).await);
        }
        assert!(!limiter.allow_at(ip(1), now).await);
        assert!(limiter.allow_at(ip(2), now).await);
    }

    #[tokio::test]
    async fn window_expiry_restores_the_budget() {
        let limiter = LoginRateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        assert!(limiter.allow_at(ip(1), start).await);
        assert!(!limiter.allow_at(ip(1), start + Duration::from_secs(59)).await);
        assert!(limiter.allow_at(ip(1), start + Duration::from_secs(60)).await);
    }

    #[test]
    fn refusal_message_follows_the_configured_window() {
        assert_eq!(
            too_many_attempts(Duration::from_secs(900)),
            "Too many login attempts. Please try again in 15 minutes."
        );
        assert_eq!(
            too_many_attempts(Duration::from_secs(45)),
            "Too many login attempts. Please try again in 1 minute."
        );
        assert!(too_many_attempts(Duration::from_secs(7200)).ends_with("120 minutes."));
    }

    #[test]
    fn forwarded_for_is_only_used_behind_a_trusted_proxy() {
        let peer: SocketAddr = "192.0.2.10:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        assert_eq!(client_ip(&headers, peer, false), peer.ip());
        assert_eq!(
            client_ip(&headers, peer, true),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );

        headers.insert("x-forwarded-for", HeaderValue::from_static("not an ip"));
        assert_eq!(client_ip(&headers, peer, true), peer.ip());
    }
}
