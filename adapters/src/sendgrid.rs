//! SendGrid-specific adapter implementation for transactional email.
//!
//! Implements the `Mailer` trait on top of the SendGrid v3 `mail/send` endpoint,
//! sending plain-text messages from a single configured sender address.

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

use crate::{ensure_success, http_client, AdapterError, EmailMessage, Mailer};

const SERVICE: &str = "sendgrid";
const DEFAULT_API_BASE: &str = "https://api.sendgrid.com";

pub struct SendGridMailer {
    http: reqwest::Client,
    api_key: String,
    from: String,
    api_base: String,
}

impl SendGridMailer {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            api_key: api_key.into(),
            from: from.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn payload(&self, message: &EmailMessage) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": self.from },
            "subject": message.subject,
            "content": [{ "type": "text/plain", "value": message.body }],
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), AdapterError> {
        let url = format!("{}/v3/mail/send", self.api_base.trim_end_matches('/'));
        debug!("Sending email to {} via SendGrid", message.to);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(message))
            .send()
            .await
            .map_err(|err| AdapterError::transport(SERVICE, err))?;

        ensure_success(SERVICE, response).await?;
        Ok(())
    }
}
