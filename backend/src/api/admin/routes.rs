//! Routes for the admin pages.

use axum::{routing::get, Router};

use super::handlers::{billing_analytics, billing_events, contacts, dashboard};
use crate::state::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/contacts", get(contacts))
        .route("/admin/billing-events", get(billing_events))
        .route("/admin/billing-analytics", get(billing_analytics))
}
