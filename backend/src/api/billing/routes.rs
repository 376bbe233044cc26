//! Routes for checkout and the payment webhook.

use axum::{routing::post, Router};

use super::handlers::{create_checkout_session, webhook};
use crate::state::AppState;

pub fn billing_router() -> Router<AppState> {
    Router::new()
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/webhook", post(webhook))
}
