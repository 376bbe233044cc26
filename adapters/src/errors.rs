//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur while talking to the payment,
//! email, SMS and CAPTCHA providers, or while verifying inbound webhooks,
//! providing a unified error handling mechanism for all integrations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{0} integration is not configured")]
    NotConfigured(&'static str),

    #[error("Request to {service} failed: {reason}")]
    Transport {
        service: &'static str,
        reason: String,
    },

    #[error("{service} rejected the request with status {status}: {body}")]
    Rejected {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {service}: {reason}")]
    UnexpectedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl AdapterError {
    pub(crate) fn transport(service: &'static str, err: reqwest::Error) -> Self {
        AdapterError::Transport {
            service,
            reason: err.to_string(),
        }
    }

    pub(crate) fn unexpected(service: &'static str, err: reqwest::Error) -> Self {
        AdapterError::UnexpectedResponse {
            service,
            reason: err.to_string(),
        }
    }
}
