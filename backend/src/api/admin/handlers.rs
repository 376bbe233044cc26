//! Handler functions for the admin dashboard and listings.

use axum::{extract::State, response::Html};
use chrono::Utc;
use minijinja::context;
use tower_sessions::Session;

use crate::auth::{AdminOnly, CurrentUser};
use crate::errors::AppError;
use crate::services::data_aggregator::aggregate;
use crate::state::AppState;
use crate::views::chrome;

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    session: Session,
) -> Result<Html<String>, AppError> {
    let contacts = state.repo.list_contacts().await?;
    let chrome = chrome(&state, &session).await?;
    state.views.render(
        "admin_dashboard.html",
        context! { chrome => chrome, contacts => contacts },
    )
}

pub async fn contacts(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    session: Session,
) -> Result<Html<String>, AppError> {
    let contacts = state.repo.list_contacts().await?;
    let chrome = chrome(&state, &session).await?;
    state.views.render(
        "admin_contacts.html",
        context! { chrome => chrome, contacts => contacts },
    )
}

pub async fn billing_events(
    State(state): State<AppState>,
    AdminOnly(_user): AdminOnly,
    session: Session,
) -> Result<Html<String>, AppError> {
    let events = state.repo.list_billing_events().await?;
    let chrome = chrome(&state, &session).await?;
    state.views.render(
        "admin_billing_events.html",
        context! { chrome => chrome, events => events },
    )
}

pub async fn billing_analytics(
    State(state): State<AppState>,
    AdminOnly(_user): AdminOnly,
    session: Session,
) -> Result<Html<String>, AppError> {
    let events = state.repo.list_billing_events().await?;
    let analytics = aggregate(&events, Utc::now());
    let chrome = chrome(&state, &session).await?;
    state.views.render(
        "admin_billing_analytics.html",
        context! { chrome => chrome, analytics => analytics },
    )
}
