//! Handler functions for the contact form.
//!
//! A submission must carry a CAPTCHA token that the verifier accepts before
//! anything is written. Accepted submissions become one row and trigger
//! best-effort email and SMS alerts in the background.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Form, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, info, warn};

use crate::database::models::NewContactSubmission;
use crate::errors::AppError;
use crate::middleware::client_ip;
use crate::services::notifier::spawn_contact_notifications;
use crate::state::AppState;
use crate::views::{chrome, set_flash};

const CONTACT_PATH: &str = "/contact";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(rename = "g-recaptcha-response")]
    pub captcha_token: String,
}

impl ContactForm {
    fn into_submission(self, created_at: i64) -> Option<NewContactSubmission> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return None;
        }

        let phone = self.phone.trim();
        Some(NewContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            message: message.to_string(),
            created_at,
        })
    }
}

pub async fn contact_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let chrome = chrome(&state, &session).await?;
    state.views.render(
        "contact.html",
        context! { chrome => chrome, site_key => state.config.captcha.site_key.clone() },
    )
}

async fn reject(session: &Session, message: &str) -> Result<Response, AppError> {
    set_flash(session, message).await?;
    Ok(Redirect::to(CONTACT_PATH).into_response())
}

pub async fn submit_contact(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<Response, AppError> {
    let token = form.captcha_token.trim().to_string();
    if token.is_empty() {
        return reject(&session, "Please complete the CAPTCHA.").await;
    }

    let Some(submission) = form.into_submission(chrono::Utc::now().timestamp()) else {
        return reject(&session, "Please fill in your name, email and message.").await;
    };

    let ip = client_ip(&headers, peer, state.config.trust_proxy).to_string();
    match state.integrations.captcha.verify(&token, Some(&ip)).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(%ip, "Contact form CAPTCHA rejected");
            return reject(&session, "CAPTCHA verification failed. Please try again.").await;
        }
        Err(err) => {
            error!(error = %err, "CAPTCHA verification error");
            return reject(&session, "CAPTCHA verification failed. Please try again.").await;
        }
    }

    let id = state.repo.insert_contact(&submission).await?;
    info!(submission_id = id, "Contact form submission stored");

    spawn_contact_notifications(
        state.integrations.clone(),
        state.config.clone(),
        submission.clone(),
    );

    let chrome = chrome(&state, &session).await?;
    Ok(state
        .views
        .render("success.html", context! { chrome => chrome, name => submission.name })?
        .into_response())
}
