//! Extractors for protecting authenticated routes and handling authorization.
//!
//! [`CurrentUser`] reads the logged-in user from the session and bounces
//! anonymous visitors to the login page; [`AdminOnly`] additionally requires
//! the `admin` role.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::{SessionUser, SESSION_USER_KEY};
use crate::errors::AppError;

pub const LOGIN_PATH: &str = "/admin/login";

#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session.get::<SessionUser>(SESSION_USER_KEY).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(Redirect::to(LOGIN_PATH).into_response()),
            Err(err) => Err(AppError::from(err).into_response()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminOnly(pub SessionUser);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(username = %user.username, "Non-admin tried to open an admin-only page");
            return Err(AppError::Forbidden.into_response());
        }
        Ok(AdminOnly(user))
    }
}
