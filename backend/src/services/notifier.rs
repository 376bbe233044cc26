//! Outbound notifications: new-lead alerts and dunning emails.
//!
//! Lead alerts are best effort. Failures are logged and never reach the
//! visitor who submitted the form.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use truview_adapters::{AdapterError, EmailMessage, SmsMessage, WebhookEvent};

use super::integrations::Integrations;
use crate::config::Config;
use crate::database::models::NewContactSubmission;

fn contact_email(to: &str, submission: &NewContactSubmission) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("New contact form submission from {}", submission.name),
        body: format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\n{}",
            submission.name,
            submission.email,
            submission.phone.as_deref().unwrap_or("-"),
            submission.message
        ),
    }
}

fn contact_sms(to: &str, submission: &NewContactSubmission) -> SmsMessage {
    let reach = submission.phone.as_deref().unwrap_or(&submission.email);
    SmsMessage {
        to: to.to_string(),
        body: format!("New TruView lead: {} ({})", submission.name, reach),
    }
}

fn dunning_email(to: &str, portal_url: &str, site_name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Action needed: your {site_name} payment failed"),
        body: format!(
            "We were unable to process your most recent payment.\n\n\
             Please update your payment details here:\n{portal_url}\n\n\
             Thank you,\n{site_name}"
        ),
    }
}

/// Sends the business inbox and phone an alert about a new submission.
pub async fn notify_contact(
    integrations: &Integrations,
    config: &Config,
    submission: &NewContactSubmission,
) {
    if let Some(to) = &config.email.notify_to {
        match integrations
            .mailer
            .send_email(&contact_email(to, submission))
            .await
        {
            Ok(()) => info!("Contact notification email sent"),
            Err(err) => warn!(error = %err, "Contact notification email failed"),
        }
    }

    if let Some(to) = &config.sms.notify_to {
        match integrations.sms.send_sms(&contact_sms(to, submission)).await {
            Ok(()) => info!("Contact notification SMS sent"),
            Err(err) => warn!(error = %err, "Contact notification SMS failed"),
        }
    }
}

pub fn spawn_contact_notifications(
    integrations: Integrations,
    config: Arc<Config>,
    submission: NewContactSubmission,
) -> JoinHandle<()> {
    tokio::spawn(async move { notify_contact(&integrations, &config, &submission).await })
}

/// Emails the customer behind a failed invoice a link to the billing portal.
///
/// Returns `Ok(false)` when the event lacks a customer or an email address.
pub async fn send_dunning_notice(
    integrations: &Integrations,
    config: &Config,
    event: &WebhookEvent,
    site_name: &str,
) -> Result<bool, AdapterError> {
    let (Some(customer), Some(email)) = (event.customer_id(), event.customer_email()) else {
        warn!(event_id = %event.id, "Failed invoice without customer or email, skipping dunning");
        return Ok(false);
    };

    let portal = integrations
        .payments
        .create_portal_session(customer, &config.url("/"))
        .await?;
    integrations
        .mailer
        .send_email(&dunning_email(email, &portal.url, site_name))
        .await?;

    info!(%customer, "Dunning email sent");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use truview_adapters::testing::{
        RecordingMailer, RecordingPayments, RecordingSms, StaticCaptcha,
    };

    struct Fakes {
        mailer: Arc<RecordingMailer>,
        sms: Arc<RecordingSms>,
        payments: Arc<RecordingPayments>,
        integrations: Integrations,
    }

    fn fakes(mailer: RecordingMailer) -> Fakes {
        let mailer = Arc::new(mailer);
        let sms = Arc::new(RecordingSms::default());
        let payments = Arc::new(RecordingPayments::default());
        let integrations = Integrations {
            payments: payments.clone(),
            mailer: mailer.clone(),
            sms: sms.clone(),
            captcha: Arc::new(StaticCaptcha { accept: true }),
        };
        Fakes {
            mailer,
            sms,
            payments,
            integrations,
        }
    }

    fn submission(phone: Option<&str>) -> NewContactSubmission {
        NewContactSubmission {
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            phone: phone.map(str::to_string),
            message: "Cracked windshield".to_string(),
            created_at: 1_700_000_000,
        }
    }

    fn notifying_config() -> Config {
        let mut config = Config::default();
        config.email.notify_to = Some("owner@truviewglass.com".to_string());
        config.sms.notify_to = Some("+15550002222".to_string());
        config
    }

    #[tokio::test]
    async fn contact_alert_goes_to_inbox_and_phone() {
        let fakes = fakes(RecordingMailer::default());
        notify_contact(&fakes.integrations, &notifying_config(), &submission(Some("+1555")))
            .await;

        let emails = fakes.mailer.sent();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to, "owner@truviewglass.com");
        assert!(emails[0].body.contains("Cracked windshield"));

        let texts = fakes.sms.sent();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].body, "New TruView lead: Dana (+1555)");
    }

    #[tokio::test]
    async fn nothing_is_sent_without_recipients() {
        let fakes = fakes(RecordingMailer::default());
        notify_contact(&fakes.integrations, &Config::default(), &submission(None)).await;
        assert!(fakes.mailer.sent().is_empty());
        assert!(fakes.sms.sent().is_empty());
    }

    #[tokio::test]
    async fn failing_mailer_does_not_stop_the_sms() {
        let fakes = fakes(RecordingMailer::failing());
        notify_contact(&fakes.integrations, &notifying_config(), &submission(None)).await;
        assert_eq!(fakes.sms.sent()[0].body, "New TruView lead: Dana (dana@example.com)");
    }

    fn failed_invoice(object: serde_json::Value) -> WebhookEvent {
        serde_json::from_value(json!({
            "id": "evt_fail",
            "type": "invoice.payment_failed",
            "data": { "object": object }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn dunning_email_links_to_the_billing_portal() {
        let fakes = fakes(RecordingMailer::default());
        let event = failed_invoice(json!({ "customer": "cus_7", "customer_email": "c@d.e" }));

        let sent = send_dunning_notice(&fakes.integrations, &Config::default(), &event, "TruView Glass")
            .await
            .unwrap();

        assert!(sent);
        assert_eq!(fakes.payments.portal_customers(), vec!["cus_7"]);
        let emails = fakes.mailer.sent();
        assert_eq!(emails[0].to, "c@d.e");
        assert!(emails[0].body.contains("https://billing.test/cus_7"));
    }

    #[tokio::test]
    async fn dunning_skips_events_without_an_email() {
        let fakes = fakes(RecordingMailer::default());
        let event = failed_invoice(json!({ "customer": "cus_7" }));
        let sent = send_dunning_notice(&fakes.integrations, &Config::default(), &event, "TruView")
            .await
            .unwrap();
        assert!(!sent);
        assert!(fakes.payments.portal_customers().is_empty());
    }
}
