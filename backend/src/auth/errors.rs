//! Custom error types specific to authentication failures.
//!
//! This module defines the errors that can occur while checking admin
//! credentials or hashing passwords.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
