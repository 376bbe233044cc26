//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, session and rate-limit settings, and the
//! credentials for the payment, email, SMS and CAPTCHA providers. Secrets may
//! come from the environment or from Docker secret files.

use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{debug, info};
use truview_adapters::{stripe::DEFAULT_WEBHOOK_TOLERANCE_SECS, CheckoutMode};

use crate::auth::Role;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub base_url: String,
    pub public_dir: String,
    pub secure_cookies: bool,
    pub session_idle: Duration,
    pub trust_proxy: bool,
    pub login_max_attempts: u32,
    pub login_window: Duration,
    pub admin_seed: Option<AdminSeed>,
    pub content_seed_path: Option<String>,
    pub stripe: StripeConfig,
    pub email: EmailConfig,
    pub sms: SmsConfig,
    pub captcha: CaptchaConfig,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub price_id: Option<String>,
    pub checkout_mode: CheckoutMode,
    pub webhook_tolerance_secs: i64,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub sendgrid_api_key: Option<String>,
    pub from: String,
    pub notify_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub notify_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CaptchaConfig {
    pub secret: Option<String>,
    pub site_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: "sqlite://truview-cms.db?mode=rwc".to_string(),
            database_max_connections: 5,
            base_url: "http://localhost:8080".to_string(),
            public_dir: "public".to_string(),
            secure_cookies: false,
            session_idle: Duration::from_secs(8 * 60 * 60),
            trust_proxy: false,
            login_max_attempts: 5,
            login_window: Duration::from_secs(15 * 60),
            admin_seed: None,
            content_seed_path: None,
            stripe: StripeConfig {
                secret_key: None,
                webhook_secret: None,
                price_id: None,
                checkout_mode: CheckoutMode::Subscription,
                webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
            },
            email: EmailConfig {
                sendgrid_api_key: None,
                from: "no-reply@truviewglass.com".to_string(),
                notify_to: None,
            },
            sms: SmsConfig {
                account_sid: None,
                auth_token: None,
                from_number: None,
                notify_to: None,
            },
            captcha: CaptchaConfig {
                secret: None,
                site_key: None,
            },
        }
    }
}

impl Config {
    /// Loads configuration from the process environment, falling back to
    /// `/run/secrets/<KEY>` for values that are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok().or_else(|| read_secret(key)))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let admin_seed = match (get("ADMIN_USERNAME"), get("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed {
                username,
                password,
                role: parse_or("ADMIN_ROLE", get("ADMIN_ROLE"), Role::Admin)?,
            }),
            _ => None,
        };

        let idle_minutes = parse_or::<u64>(
            "SESSION_IDLE_MINUTES",
            get("SESSION_IDLE_MINUTES"),
            defaults.session_idle.as_secs() / 60,
        )?;
        let session_idle = idle_minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::Invalid {
                key: "SESSION_IDLE_MINUTES",
                reason: format!("{idle_minutes} minutes is too long"),
            })?;

        let checkout_mode = match get("STRIPE_CHECKOUT_MODE").as_deref() {
            None => defaults.stripe.checkout_mode,
            Some("subscription") => CheckoutMode::Subscription,
            Some("payment") => CheckoutMode::Payment,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STRIPE_CHECKOUT_MODE",
                    reason: format!("expected `payment` or `subscription`, got `{other}`"),
                })
            }
        };

        Ok(Self {
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
            )?,
            base_url: get("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            public_dir: get("PUBLIC_DIR").unwrap_or(defaults.public_dir),
            secure_cookies: parse_or("COOKIE_SECURE", get("COOKIE_SECURE"), defaults.secure_cookies)?,
            session_idle,
            trust_proxy: parse_or("TRUST_PROXY", get("TRUST_PROXY"), defaults.trust_proxy)?,
            login_max_attempts: parse_or(
                "LOGIN_MAX_ATTEMPTS",
                get("LOGIN_MAX_ATTEMPTS"),
                defaults.login_max_attempts,
            )?,
            login_window: Duration::from_secs(parse_or(
                "LOGIN_WINDOW_SECS",
                get("LOGIN_WINDOW_SECS"),
                defaults.login_window.as_secs(),
            )?),
            admin_seed,
            content_seed_path: get("CONTENT_SEED_PATH"),
            stripe: StripeConfig {
                secret_key: get("STRIPE_SECRET_KEY"),
                webhook_secret: get("STRIPE_WEBHOOK_SECRET"),
                price_id: get("STRIPE_PRICE_ID"),
                checkout_mode,
                webhook_tolerance_secs: defaults.stripe.webhook_tolerance_secs,
            },
            email: EmailConfig {
                sendgrid_api_key: get("SENDGRID_API_KEY"),
                from: get("EMAIL_FROM").unwrap_or(defaults.email.from),
                notify_to: get("NOTIFY_EMAIL"),
            },
            sms: SmsConfig {
                account_sid: get("TWILIO_ACCOUNT_SID"),
                auth_token: get("TWILIO_AUTH_TOKEN"),
                from_number: get("TWILIO_FROM_NUMBER"),
                notify_to: get("NOTIFY_PHONE"),
            },
            captcha: CaptchaConfig {
                secret: get("RECAPTCHA_SECRET"),
                site_key: get("RECAPTCHA_SITE_KEY"),
            },
        })
    }

    /// Absolute URL for a site path such as `/admin`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            debug!("No secret file for {secret_name}: {e}");
        })
        .ok()
}
