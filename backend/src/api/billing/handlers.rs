//! Handler functions for payments.
//!
//! Every webhook that passes signature verification is appended to the
//! billing event log verbatim. Completed checkouts are logged; failed invoices
//! trigger a dunning email with a billing-portal link.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};
use truview_adapters::{
    stripe::verify_webhook, AdapterError, CheckoutRequest, WebhookEvent, CHECKOUT_COMPLETED,
    INVOICE_PAYMENT_FAILED,
};

use crate::auth::CurrentUser;
use crate::database::models::NewBillingEvent;
use crate::database::seed::DEFAULT_SITE_NAME;
use crate::errors::AppError;
use crate::services::notifier::send_dunning_notice;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

pub async fn create_checkout_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Redirect, AppError> {
    let stripe = &state.config.stripe;
    let price_id = stripe
        .price_id
        .clone()
        .ok_or(AdapterError::NotConfigured("checkout price"))?;

    let request = CheckoutRequest {
        price_id,
        quantity: 1,
        mode: stripe.checkout_mode.clone(),
        success_url: state.config.url("/admin?checkout=success"),
        cancel_url: state.config.url("/admin?checkout=cancelled"),
        customer_id: user.stripe_customer_id.clone(),
    };

    let session = state
        .integrations
        .payments
        .create_checkout_session(&request)
        .await?;
    info!(username = %user.username, checkout_session = %session.id, "Checkout session created");

    Ok(Redirect::to(&session.url))
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

pub async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        warn!("Webhook without signature header");
        return bad_request("Webhook Error: missing signature".to_string());
    };

    let secret = state.config.stripe.webhook_secret.as_deref().unwrap_or("");
    let event = match verify_webhook(
        &body,
        signature,
        secret,
        chrono::Utc::now().timestamp(),
        state.config.stripe.webhook_tolerance_secs,
    ) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "Webhook signature verification failed");
            return bad_request(format!("Webhook Error: {err}"));
        }
    };

    let record = NewBillingEvent {
        customer_id: event.customer_id().map(str::to_string),
        event_type: event.event_type.clone(),
        details: event.data.object.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };
    if let Err(err) = state.repo.insert_billing_event(&record).await {
        error!(error = %err, event_type = %event.event_type, "Could not log billing event");
        return bad_request("Webhook Error: could not record event".to_string());
    }
    info!(event_id = %event.id, event_type = %event.event_type, "Billing event logged");

    handle_event(&state, &event).await;

    Json(json!({ "received": true })).into_response()
}

async fn handle_event(state: &AppState, event: &WebhookEvent) {
    match event.event_type.as_str() {
        CHECKOUT_COMPLETED => {
            info!(
                customer = event.customer_id().unwrap_or("unknown"),
                "Checkout completed"
            );
        }
        INVOICE_PAYMENT_FAILED => {
            let site_name = site_name(state).await;
            if let Err(err) =
                send_dunning_notice(&state.integrations, &state.config, event, &site_name).await
            {
                error!(error = %err, event_id = %event.id, "Dunning notice failed");
            }
        }
        _ => {}
    }
}

async fn site_name(state: &AppState) -> String {
    match state.repo.global_content().await {
        Ok(rows) => rows
            .into_iter()
            .find(|row| row.key == "site_name")
            .and_then(|row| row.value)
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
        Err(err) => {
            warn!(error = %err, "Falling back to default site name");
            DEFAULT_SITE_NAME.to_string()
        }
    }
}
