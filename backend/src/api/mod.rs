//! Central module for organizing the site's HTTP endpoints.
//!
//! This module acts as a top-level container for the public pages, the
//! contact form, the landing pages, payments and the admin listings,
//! excluding login and logout which live in `auth`.

pub mod admin;
pub mod billing;
pub mod contact;
pub mod landing;
pub mod site;

use axum::Router;

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(site::routes::site_router())
        .merge(contact::routes::contact_router())
        .merge(landing::routes::landing_router())
        .merge(billing::routes::billing_router())
        .merge(admin::routes::admin_router())
}
