//! Handler functions for authentication-related endpoints.
//!
//! These functions render the login form, check submitted credentials through
//! `auth::service`, and store or clear the session user.

use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;
use tower_sessions::Session;
use tracing::{error, info, warn};

use super::{middleware::LOGIN_PATH, service, AuthError, LoginForm, SessionUser, SESSION_USER_KEY};
use crate::errors::AppError;
use crate::state::AppState;
use crate::views::{chrome, set_flash};

const DASHBOARD_PATH: &str = "/admin";

pub async fn login_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    if session.get::<SessionUser>(SESSION_USER_KEY).await?.is_some() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    let chrome = chrome(&state, &session).await?;
    Ok(state
        .views
        .render("admin_login.html", context! { chrome => chrome })?
        .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    match service::authenticate(state.repo.as_ref(), &form.username, &form.password).await {
        Ok(user) => {
            session.cycle_id().await?;
            session.insert(SESSION_USER_KEY, &user).await?;
            info!(username = %user.username, role = %user.role, "Admin logged in");
            Ok(Redirect::to(DASHBOARD_PATH))
        }
        Err(AuthError::InvalidCredentials) => {
            warn!(username = %form.username, "Rejected login attempt");
            set_flash(&session, "Invalid username or password.").await?;
            Ok(Redirect::to(LOGIN_PATH))
        }
        Err(err) => {
            error!(error = %err, "Login error");
            set_flash(&session, "Something went wrong. Please try again.").await?;
            Ok(Redirect::to(LOGIN_PATH))
        }
    }
}

pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session.flush().await?;
    Ok(Redirect::to(LOGIN_PATH))
}
