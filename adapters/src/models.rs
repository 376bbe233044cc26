//! Generic data models for the `adapters` crate.
//!
//! These models are the provider-neutral shapes the backend hands to, and
//! receives from, any integration: checkout and portal sessions, outbound
//! email and SMS messages, and decoded payment webhook events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type sent when a hosted checkout finishes successfully.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Event type sent when an invoice charge fails.
pub const INVOICE_PAYMENT_FAILED: &str = "invoice.payment_failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    Payment,
    Subscription,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
            CheckoutMode::Subscription => "subscription",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub quantity: u32,
    pub mode: CheckoutMode,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_id: Option<String>,
}

/// A hosted checkout page created by the payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// A self-service billing portal link for an existing customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

/// A payment webhook event after its signature has been verified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: i64,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEventData {
    pub object: Value,
}

impl WebhookEvent {
    /// Customer reference carried by the event object, if any.
    pub fn customer_id(&self) -> Option<&str> {
        self.data.object.get("customer").and_then(Value::as_str)
    }

    /// Email address the processor has on file for the invoice's customer.
    pub fn customer_email(&self) -> Option<&str> {
        self.data
            .object
            .get("customer_email")
            .and_then(Value::as_str)
            .or_else(|| {
                self.data
                    .object
                    .pointer("/customer_details/email")
                    .and_then(Value::as_str)
            })
    }
}
