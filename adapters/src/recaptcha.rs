//! Google reCAPTCHA adapter implementation.
//!
//! Implements the `CaptchaVerifier` trait against the `siteverify` endpoint.

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;

use crate::{ensure_success, http_client, AdapterError, CaptchaVerifier};

const SERVICE: &str = "recaptcha";
const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

pub struct RecaptchaVerifier {
    http: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl RecaptchaVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            secret: secret.into(),
            verify_url: DEFAULT_VERIFY_URL.to_string(),
        }
    }

    pub fn with_verify_url(mut self, verify_url: impl Into<String>) -> Self {
        self.verify_url = verify_url.into();
        self
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, AdapterError> {
        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let response = self
            .http
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|err| AdapterError::transport(SERVICE, err))?;

        let verdict = ensure_success(SERVICE, response)
            .await?
            .json::<SiteVerifyResponse>()
            .await
            .map_err(|err| AdapterError::unexpected(SERVICE, err))?;

        if !verdict.success {
            warn!("CAPTCHA rejected: {:?}", verdict.error_codes);
        }
        Ok(verdict.success)
    }
}
