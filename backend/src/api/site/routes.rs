//! Routes for the public pages, sitemap and health check.

use axum::{routing::get, Router};

use super::handlers::{about, health, home, sitemap};
use crate::state::AppState;

pub fn site_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/sitemap.xml", get(sitemap))
        .route("/health", get(health))
}
