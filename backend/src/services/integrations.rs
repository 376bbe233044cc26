//! Builds and holds the clients for every external provider.
//!
//! Each integration is chosen once at startup: a configured provider gets its
//! HTTP client, a missing one gets the matching disabled adapter.

use std::sync::Arc;

use tracing::{info, warn};
use truview_adapters::{
    disabled::{DisabledPayments, LogOnlyMailer, LogOnlySms, SkipCaptcha},
    recaptcha::RecaptchaVerifier,
    sendgrid::SendGridMailer,
    stripe::StripeClient,
    twilio::TwilioSms,
    CaptchaVerifier, Mailer, PaymentGateway, SmsSender,
};

use crate::config::Config;

#[derive(Clone)]
pub struct Integrations {
    pub payments: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
    pub sms: Arc<dyn SmsSender>,
    pub captcha: Arc<dyn CaptchaVerifier>,
}

impl Integrations {
    pub fn from_config(config: &Config) -> Self {
        let payments: Arc<dyn PaymentGateway> = match &config.stripe.secret_key {
            Some(key) => {
                info!("Stripe payments enabled");
                Arc::new(StripeClient::new(key.clone()))
            }
            None => {
                warn!("STRIPE_SECRET_KEY not set, checkout is disabled");
                Arc::new(DisabledPayments)
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.email.sendgrid_api_key {
            Some(key) => Arc::new(SendGridMailer::new(key.clone(), config.email.from.clone())),
            None => {
                warn!("SENDGRID_API_KEY not set, emails will only be logged");
                Arc::new(LogOnlyMailer)
            }
        };

        let sms: Arc<dyn SmsSender> = match (
            &config.sms.account_sid,
            &config.sms.auth_token,
            &config.sms.from_number,
        ) {
            (Some(sid), Some(token), Some(from)) => {
                Arc::new(TwilioSms::new(sid.clone(), token.clone(), from.clone()))
            }
            _ => {
                warn!("Twilio credentials incomplete, SMS will only be logged");
                Arc::new(LogOnlySms)
            }
        };

        let captcha: Arc<dyn CaptchaVerifier> = match &config.captcha.secret {
            Some(secret) => Arc::new(RecaptchaVerifier::new(secret.clone())),
            None => {
                warn!("RECAPTCHA_SECRET not set, CAPTCHA tokens are not verified");
                Arc::new(SkipCaptcha)
            }
        };

        Self {
            payments,
            mailer,
            sms,
            captcha,
        }
    }
}
