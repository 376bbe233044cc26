//! Global application error types and handlers.
//!
//! This module defines the error types used across the entire backend: the
//! request-level [`AppError`], which knows how to turn itself into an HTTP
//! response, and the [`StartupError`] returned while bringing the server up.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use truview_adapters::AdapterError;

use crate::config::ConfigError;
use crate::database::seed::SeedError;

/// Body sent for every 5xx response; the cause only goes to the log.
pub const GENERIC_FAILURE: &str = "Something went wrong!";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Integration error: {0}")]
    Integration(#[from] AdapterError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Integration(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
            return (status, GENERIC_FAILURE).into_response();
        }

        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database setup failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("Template setup failed: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
