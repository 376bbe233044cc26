//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the connection pool, creating
//! the schema idempotently at startup for either SQLite or Postgres, and
//! seeding the default site content and admin account.

pub mod models;
pub mod queries;
pub mod seed;

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use tracing::info;

pub use queries::{DbResult, Repository, SqlRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("sqlite:") {
            Some(Dialect::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Dialect::Postgres)
        } else {
            None
        }
    }

    fn primary_key(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
            Dialect::Postgres => "BIGSERIAL PRIMARY KEY",
        }
    }

    fn integer(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "INTEGER",
            Dialect::Postgres => "BIGINT",
        }
    }
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS global_content (
        id {pk},
        key TEXT NOT NULL UNIQUE,
        value TEXT
    )",
    "CREATE TABLE IF NOT EXISTS admin_users (
        id {pk},
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'manager',
        stripe_customer_id TEXT
    )",
    "CREATE TABLE IF NOT EXISTS contact_submissions (
        id {pk},
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        message TEXT NOT NULL,
        created_at {int} NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS billing_events (
        id {pk},
        customer_id TEXT,
        event_type TEXT NOT NULL,
        details TEXT NOT NULL,
        timestamp {int} NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS location_content (
        id {pk},
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS service_content (
        id {pk},
        location_id {int} NOT NULL REFERENCES location_content(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        slug TEXT NOT NULL,
        description TEXT NOT NULL,
        hero_image_url TEXT,
        cta_text TEXT,
        testimonials TEXT NOT NULL DEFAULT '[]',
        faqs TEXT NOT NULL DEFAULT '[]',
        UNIQUE (location_id, slug)
    )",
];

fn schema_statements(dialect: Dialect) -> Vec<String> {
    SCHEMA
        .iter()
        .map(|ddl| {
            ddl.replace("{pk}", dialect.primary_key())
                .replace("{int}", dialect.integer())
        })
        .collect()
}

/// Opens the pool for `url`; the scheme selects the SQLite or Postgres driver.
pub async fn connect(url: &str, max_connections: u32) -> DbResult<(AnyPool, Dialect)> {
    let dialect = Dialect::from_url(url).ok_or_else(|| {
        sqlx::Error::Configuration(format!("unsupported database url scheme: {url}").into())
    })?;
    install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    info!(?dialect, "Connected to database");
    Ok((pool, dialect))
}

/// Creates every table that does not exist yet.
pub async fn ensure_schema(pool: &AnyPool, dialect: Dialect) -> DbResult<()> {
    info!("Running database migrations...");
    for statement in schema_statements(dialect) {
        sqlx::query(&statement).execute(pool).await?;
    }
    info!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_follows_url_scheme() {
        assert_eq!(Dialect::from_url("sqlite://cms.db?mode=rwc"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::from_url("sqlite::memory:"), Some(Dialect::Sqlite));
        assert_eq!(
            Dialect::from_url("postgresql://u:p@db.example.com/cms"),
            Some(Dialect::Postgres)
        );
        assert_eq!(Dialect::from_url("mysql://localhost/cms"), None);
    }

    #[test]
    fn postgres_schema_uses_bigserial_keys() {
        let statements = schema_statements(Dialect::Postgres);
        assert_eq!(statements.len(), 6);
        assert!(statements.iter().all(|s| s.contains("BIGSERIAL PRIMARY KEY")));
        assert!(statements.iter().all(|s| !s.contains('{')));
        assert!(statements[5].contains("location_id BIGINT NOT NULL"));
    }

    #[test]
    fn sqlite_schema_uses_autoincrement_keys() {
        let statements = schema_statements(Dialect::Sqlite);
        assert!(statements
            .iter()
            .all(|s| s.contains("INTEGER PRIMARY KEY AUTOINCREMENT")));
    }
}
