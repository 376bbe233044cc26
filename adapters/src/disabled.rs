//! Fallback adapters used when a provider has no credentials configured.
//!
//! Notifications degrade to log lines, payments refuse to run, and CAPTCHA
//! verification is skipped so a local instance still accepts contact forms.

use async_trait::async_trait;
use log::{info, warn};

use crate::{
    AdapterError, CaptchaVerifier, CheckoutRequest, CheckoutSession, EmailMessage, Mailer,
    PaymentGateway, PortalSession, SmsMessage, SmsSender,
};

pub struct DisabledPayments;

#[async_trait]
impl PaymentGateway for DisabledPayments {
    async fn create_checkout_session(
        &self,
        _request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AdapterError> {
        Err(AdapterError::NotConfigured("payments"))
    }

    async fn create_portal_session(
        &self,
        _customer_id: &str,
        _return_url: &str,
    ) -> Result<PortalSession, AdapterError> {
        Err(AdapterError::NotConfigured("payments"))
    }
}

pub struct LogOnlyMailer;

#[async_trait]
impl Mailer for LogOnlyMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), AdapterError> {
        info!(
            "Email delivery disabled, dropping message to {}: {}",
            message.to, message.subject
        );
        Ok(())
    }
}

pub struct LogOnlySms;

#[async_trait]
impl SmsSender for LogOnlySms {
    async fn send_sms(&self, message: &SmsMessage) -> Result<(), AdapterError> {
        info!("SMS delivery disabled, dropping message to {}", message.to);
        Ok(())
    }
}

pub struct SkipCaptcha;

#[async_trait]
impl CaptchaVerifier for SkipCaptcha {
    async fn verify(&self, _token: &str, _remote_ip: Option<&str>) -> Result<bool, AdapterError> {
        warn!("CAPTCHA secret not configured, accepting token without verification");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_payments_report_not_configured() {
        let err = DisabledPayments
            .create_portal_session("cus_1", "http://localhost")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::NotConfigured("payments")));
    }

    #[tokio::test]
    async fn log_only_notifiers_succeed() {
        let email = EmailMessage {
            to: "a@b.c".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(LogOnlyMailer.send_email(&email).await.is_ok());
        let sms = SmsMessage {
            to: "+1555".to_string(),
            body: "b".to_string(),
        };
        assert!(LogOnlySms.send_sms(&sms).await.is_ok());
        assert!(SkipCaptcha.verify("token", None).await.unwrap());
    }
}
