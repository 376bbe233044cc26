//! Core `adapters` crate for abstracting the site's third-party services.
//!
//! This crate defines one trait per external collaborator (payments, email,
//! SMS, CAPTCHA), and provides a central point for accessing the concrete
//! HTTP implementations (Stripe, SendGrid, Twilio, reCAPTCHA) as well as the
//! disabled fallbacks used when a service has no credentials.

use async_trait::async_trait;

pub mod disabled;
pub mod errors;
pub mod models;
pub mod recaptcha;
pub mod sendgrid;
pub mod stripe;
pub mod twilio;

#[cfg(feature = "testing")]
pub mod testing;

pub use errors::AdapterError;
pub use models::*;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted checkout page and returns where to send the browser.
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AdapterError>;

    /// Creates a billing portal link the customer can use to fix their payment method.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, AdapterError>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), AdapterError>;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, message: &SmsMessage) -> Result<(), AdapterError>;
}

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Returns `Ok(false)` when the provider answered but did not accept the token.
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, AdapterError>;
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AdapterError::Rejected {
        service,
        status: status.as_u16(),
        body,
    })
}
