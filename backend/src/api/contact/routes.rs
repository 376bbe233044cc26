//! Routes for the contact form.

use axum::{routing::get, Router};

use super::handlers::{contact_form, submit_contact};
use crate::state::AppState;

pub fn contact_router() -> Router<AppState> {
    Router::new().route("/contact", get(contact_form).post(submit_contact))
}
