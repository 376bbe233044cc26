//! Public pages that are not tied to a form: home, about, sitemap and health.

pub mod handlers;
pub mod routes;
