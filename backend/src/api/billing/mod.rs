//! Payment endpoints: starting a hosted checkout and receiving processor webhooks.

pub mod handlers;
pub mod routes;
