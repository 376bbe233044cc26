//! Data structures for authentication-related entities.
//!
//! This module defines the admin roles, the user record kept in the session
//! after a successful login, and the login form payload.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::database::models::AdminUser;

/// Session key holding the logged-in [`SessionUser`].
pub const SESSION_USER_KEY: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub stripe_customer_id: Option<String>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<AdminUser> for SessionUser {
    fn from(user: AdminUser) -> Self {
        // Unknown roles in the table get the least privileged role.
        let role = user.role.parse().unwrap_or(Role::Manager);
        Self {
            id: user.id,
            username: user.username,
            role,
            stripe_customer_id: user.stripe_customer_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" manager ".parse::<Role>(), Ok(Role::Manager));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn unknown_stored_role_downgrades_to_manager() {
        let user = SessionUser::from(AdminUser {
            id: 7,
            username: "ops".to_string(),
            password_hash: "x".to_string(),
            role: "superuser".to_string(),
            stripe_customer_id: None,
        });
        assert_eq!(user.role, Role::Manager);
        assert!(!user.is_admin());
    }
}
