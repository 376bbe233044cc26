//! TruView CMS backend.
//!
//! Marketing site, landing pages, contact intake, admin dashboard and
//! payment webhooks served from a single Axum application.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod services;
pub mod state;
pub mod views;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::errors::StartupError;
use crate::state::AppState;

/// Assembles every route, the static file fallback and the session layer.
pub fn build_router(state: AppState) -> Router {
    let idle = i64::try_from(state.config.session_idle.as_secs()).unwrap_or(i64::MAX);
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.secure_cookies)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(idle)));

    Router::new()
        .merge(auth::auth_router(state.clone()))
        .merge(api::api_router())
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState::from_config(config).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "TruView CMS listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!(error = %err, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!(error = %err, "Failed to install signal handler");
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
