//! Handler functions for the static and derived public pages.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use minijinja::context;
use serde::Serialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::error;

use crate::errors::AppError;
use crate::services::landing::{landing_path, landing_url};
use crate::state::AppState;
use crate::views::chrome;

const STATIC_PAGES: &[&str] = &["/", "/about", "/contact"];

#[derive(Serialize)]
struct PageLink {
    slug: String,
    location: String,
    path: String,
}

pub async fn home(State(state): State<AppState>, session: Session) -> Result<Html<String>, AppError> {
    let chrome = chrome(&state, &session).await?;
    let pages: Vec<PageLink> = state
        .repo
        .list_landing_pages()
        .await?
        .into_iter()
        .map(|page| PageLink {
            path: landing_path(&page.slug, &page.location),
            slug: page.slug,
            location: page.location,
        })
        .collect();

    state
        .views
        .render("home.html", context! { chrome => chrome, pages => pages })
}

pub async fn about(State(state): State<AppState>, session: Session) -> Result<Html<String>, AppError> {
    let chrome = chrome(&state, &session).await?;
    state.views.render("about.html", context! { chrome => chrome })
}

pub async fn sitemap(State(state): State<AppState>) -> Result<Response, AppError> {
    let base = &state.config.base_url;
    let mut urls: Vec<String> = STATIC_PAGES
        .iter()
        .map(|path| state.config.url(path))
        .collect();

    for page in state.repo.list_landing_pages().await? {
        match landing_url(base, &page.slug, &page.location) {
            Some(url) => urls.push(url.to_string()),
            None => error!(%base, "BASE_URL is not a valid absolute URL"),
        }
    }

    let body = state
        .views
        .render_string("sitemap.xml", context! { urls => urls })?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}

pub async fn health(State(state): State<AppState>) -> Response {
    match state.repo.ping().await {
        Ok(()) => Json(json!({ "status": "ok", "database": "ok" })).into_response(),
        Err(err) => {
            error!(error = %err, "Health check database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
                .into_response()
        }
    }
}
