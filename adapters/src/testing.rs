//! In-memory adapters that record what they were asked to do.
//!
//! Enabled with the `testing` feature so the backend's tests can assert on
//! outbound email, SMS and payment calls without reaching any provider.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    AdapterError, CaptchaVerifier, CheckoutRequest, CheckoutSession, EmailMessage, Mailer,
    PaymentGateway, PortalSession, SmsMessage, SmsSender,
};

fn snapshot<T: Clone>(items: &Mutex<Vec<T>>) -> Vec<T> {
    items.lock().map(|guard| guard.clone()).unwrap_or_default()
}

fn record<T>(items: &Mutex<Vec<T>>, item: T) {
    if let Ok(mut guard) = items.lock() {
        guard.push(item);
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        snapshot(&self.sent)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), AdapterError> {
        if self.fail {
            return Err(AdapterError::Rejected {
                service: "recording-mailer",
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        record(&self.sent, message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSms {
    sent: Mutex<Vec<SmsMessage>>,
}

impl RecordingSms {
    pub fn sent(&self) -> Vec<SmsMessage> {
        snapshot(&self.sent)
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send_sms(&self, message: &SmsMessage) -> Result<(), AdapterError> {
        record(&self.sent, message.clone());
        Ok(())
    }
}

/// Answers every verification with a fixed verdict.
pub struct StaticCaptcha {
    pub accept: bool,
}

#[async_trait]
impl CaptchaVerifier for StaticCaptcha {
    async fn verify(&self, _token: &str, _remote_ip: Option<&str>) -> Result<bool, AdapterError> {
        Ok(self.accept)
    }
}

#[derive(Default)]
pub struct RecordingPayments {
    checkouts: Mutex<Vec<CheckoutRequest>>,
    portals: Mutex<Vec<String>>,
}

impl RecordingPayments {
    pub fn checkouts(&self) -> Vec<CheckoutRequest> {
        snapshot(&self.checkouts)
    }

    pub fn portal_customers(&self) -> Vec<String> {
        snapshot(&self.portals)
    }
}

#[async_trait]
impl PaymentGateway for RecordingPayments {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AdapterError> {
        record(&self.checkouts, request.clone());
        Ok(CheckoutSession {
            id: "cs_test_1".to_string(),
            url: "https://checkout.test/cs_test_1".to_string(),
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        _return_url: &str,
    ) -> Result<PortalSession, AdapterError> {
        record(&self.portals, customer_id.to_string());
        Ok(PortalSession {
            id: "bps_test_1".to_string(),
            url: format!("https://billing.test/{customer_id}"),
        })
    }
}
