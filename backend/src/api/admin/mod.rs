//! Admin dashboard and read-only listings.
//!
//! Every page requires a logged-in user; billing pages require the `admin` role.

pub mod handlers;
pub mod routes;
