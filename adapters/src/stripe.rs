//! Stripe-specific adapter implementation for payment processing.
//!
//! This file contains the `PaymentGateway` implementation backed by the Stripe
//! REST API (hosted checkout and billing portal), plus verification of the
//! `Stripe-Signature` header carried by inbound webhooks.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::debug;
use serde::de::DeserializeOwned;
use sha2::Sha256;

use crate::{
    ensure_success, http_client, AdapterError, CheckoutRequest, CheckoutSession,
    PaymentGateway, PortalSession, WebhookEvent,
};

const SERVICE: &str = "stripe";
const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Maximum age, in seconds, of a signed webhook before it is refused.
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            secret_key: secret_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, AdapterError> {
        let url = format!("{}{}", self.api_base.trim_end_matches('/'), path);
        debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|err| AdapterError::transport(SERVICE, err))?;

        ensure_success(SERVICE, response)
            .await?
            .json::<T>()
            .await
            .map_err(|err| AdapterError::unexpected(SERVICE, err))
    }
}

fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), request.mode.as_str().to_string()),
        ("line_items[0][price]".to_string(), request.price_id.clone()),
        (
            "line_items[0][quantity]".to_string(),
            request.quantity.to_string(),
        ),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];
    if let Some(customer) = &request.customer_id {
        form.push(("customer".to_string(), customer.clone()));
    }
    form
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AdapterError> {
        self.post_form("/v1/checkout/sessions", &checkout_form(request))
            .await
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, AdapterError> {
        let form = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("return_url".to_string(), return_url.to_string()),
        ];
        self.post_form("/v1/billing_portal/sessions", &form).await
    }
}

fn signing_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Hmac<Sha256>, AdapterError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|err| AdapterError::InvalidSignature(err.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Hex-encoded `v1` signature for `payload` sent at `timestamp`.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, AdapterError> {
    let mac = signing_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds a complete `Stripe-Signature` header value for `payload`.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, AdapterError> {
    Ok(format!(
        "t={timestamp},v1={}",
        sign_payload(secret, timestamp, payload)?
    ))
}

/// Checks the `Stripe-Signature` header against `secret` and decodes the event.
///
/// The header carries `t=<unix seconds>` and one or more `v1=<hex>` entries;
/// any matching `v1` is accepted as long as `t` lies within `tolerance_secs`
/// of `now`.
pub fn verify_webhook(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<WebhookEvent, AdapterError> {
    if secret.is_empty() {
        return Err(AdapterError::NotConfigured("webhook secret"));
    }

    let mut timestamp = None;
    let mut candidates = Vec::new();
    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| AdapterError::InvalidSignature("missing timestamp".to_string()))?;
    if candidates.is_empty() {
        return Err(AdapterError::InvalidSignature(
            "no v1 signature present".to_string(),
        ));
    }
    if now.abs_diff(timestamp) > tolerance_secs.unsigned_abs() {
        return Err(AdapterError::InvalidSignature(format!(
            "timestamp {timestamp} outside tolerance"
        )));
    }

    let mac = signing_mac(secret, timestamp, payload)?;
    let matched = candidates.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });
    if !matched {
        return Err(AdapterError::InvalidSignature(
            "signature mismatch".to_string(),
        ));
    }

    Ok(serde_json::from_slice(payload)?)
}
