//! Route for the landing pages.

use axum::{routing::get, Router};

use super::handlers::landing_page;
use crate::state::AppState;

pub fn landing_router() -> Router<AppState> {
    Router::new().route("/services/{service_slug}/{location}", get(landing_page))
}
