//! Authentication module for managing admin accounts, sessions, and access control.
//!
//! This module provides the public interface for authentication-related
//! functionality such as login, logout, password hashing and the extractors
//! that gate the admin pages.

pub mod routes;
pub mod handlers;
pub mod models;
pub mod middleware;
pub mod service;
pub mod errors;

// Re-exports for convenience
pub use middleware::{AdminOnly, CurrentUser};
pub use models::*;
pub use routes::*;
pub use errors::*;
