//! The public contact form.

pub mod handlers;
pub mod routes;
