//! Handler function for the service × location landing pages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use minijinja::context;
use tower_sessions::Session;
use tracing::debug;

use crate::errors::AppError;
use crate::services::landing;
use crate::state::AppState;
use crate::views::chrome;

pub async fn landing_page(
    State(state): State<AppState>,
    session: Session,
    Path((service_slug, location)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let page = landing::resolve(state.repo.as_ref(), &service_slug, &location).await?;
    let chrome = chrome(&state, &session).await?;

    match page {
        Some(page) => Ok(state
            .views
            .render("landing.html", context! { chrome => chrome, page => page })?
            .into_response()),
        None => {
            debug!(%service_slug, %location, "No landing page for request");
            let html = state
                .views
                .render("not_found.html", context! { chrome => chrome })?;
            Ok((StatusCode::NOT_FOUND, html).into_response())
        }
    }
}
