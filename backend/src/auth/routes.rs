//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle admin login and logout. Login submissions pass through
//! the per-IP attempt limiter before reaching the handler.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use super::handlers::{login, login_form, logout};
use crate::middleware::limit_login_attempts;
use crate::state::AppState;

pub fn auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_form).post(login))
        .route("/admin/logout", post(logout))
        .route_layer(from_fn_with_state(state, limit_login_attempts))
}
