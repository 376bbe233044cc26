//! Dynamic "service × location" landing pages.

pub mod handlers;
pub mod routes;
