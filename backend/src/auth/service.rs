//! Core business logic for the authentication system.
//!
//! This service handles password hashing and credential checks. bcrypt is
//! deliberately slow, so both directions run on the blocking thread pool.

use tracing::debug;

use super::{AuthError, SessionUser};
use crate::database::Repository;

pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|err| AuthError::Task(err.to_string()))?
        .map_err(AuthError::from)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| AuthError::Task(err.to_string()))?
        .map_err(AuthError::from)
}

/// Looks up `username` and checks `password` against its stored hash.
pub async fn authenticate(
    repo: &dyn Repository,
    username: &str,
    password: &str,
) -> Result<SessionUser, AuthError> {
    let Some(user) = repo.find_admin_by_username(username).await? else {
        debug!(%username, "Login for unknown user");
        return Err(AuthError::InvalidCredentials);
    };

    if verify_password(password, &user.password_hash).await? {
        Ok(SessionUser::from(user))
    } else {
        Err(AuthError::InvalidCredentials)
    }
}
