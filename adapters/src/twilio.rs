//! Twilio-specific adapter implementation for SMS delivery.
//!
//! Implements the `SmsSender` trait with the Twilio Messages API, authenticating
//! with the account SID and auth token.

use async_trait::async_trait;
use log::debug;

use crate::{ensure_success, http_client, AdapterError, SmsMessage, SmsSender};

const SERVICE: &str = "twilio";
const DEFAULT_API_BASE: &str = "https://api.twilio.com";

pub struct TwilioSms {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_base: String,
}

impl TwilioSms {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            http: http_client(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSms {
    async fn send_sms(&self, message: &SmsMessage) -> Result<(), AdapterError> {
        debug!("Sending SMS to {} via Twilio", message.to);

        let form = [
            ("To", message.to.as_str()),
            ("From", self.from_number.as_str()),
            ("Body", message.body.as_str()),
        ];
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|err| AdapterError::transport(SERVICE, err))?;

        ensure_success(SERVICE, response).await?;
        Ok(())
    }
}
