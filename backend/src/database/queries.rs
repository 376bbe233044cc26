//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations behind the
//! [`Repository`] trait, so handlers and services depend on an injected
//! data-access interface instead of a concrete pool. [`SqlRepository`] is the
//! production implementation; its statements use `$n` placeholders and
//! `ON CONFLICT`/`RETURNING`, which both SQLite and Postgres accept.

use async_trait::async_trait;
use sqlx::AnyPool;

use super::models::{
    AdminUser, BillingEvent, ContactSubmission, GlobalContent, LandingPageRef, LocationContent,
    NewAdminUser, NewBillingEvent, NewContactSubmission, NewServiceContent, ServiceContent,
};

pub type DbResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn ping(&self) -> DbResult<()>;

    async fn find_admin_by_username(&self, username: &str) -> DbResult<Option<AdminUser>>;
    /// Returns `false` when the username already exists.
    async fn insert_admin_if_absent(&self, user: &NewAdminUser) -> DbResult<bool>;
    async fn count_admins(&self) -> DbResult<i64>;

    async fn insert_contact(&self, submission: &NewContactSubmission) -> DbResult<i64>;
    async fn list_contacts(&self) -> DbResult<Vec<ContactSubmission>>;

    async fn insert_billing_event(&self, event: &NewBillingEvent) -> DbResult<i64>;
    async fn list_billing_events(&self) -> DbResult<Vec<BillingEvent>>;

    async fn global_content(&self) -> DbResult<Vec<GlobalContent>>;
    /// Returns `false` when the key already exists.
    async fn insert_global_if_absent(&self, key: &str, value: &str) -> DbResult<bool>;

    async fn find_location(&self, name: &str) -> DbResult<Option<LocationContent>>;
    async fn ensure_location(&self, name: &str) -> DbResult<LocationContent>;
    async fn find_service(&self, slug: &str, location_id: i64) -> DbResult<Option<ServiceContent>>;
    /// Returns `false` when the location already has a service with this slug.
    async fn insert_service_if_absent(&self, service: &NewServiceContent) -> DbResult<bool>;
    async fn list_landing_pages(&self) -> DbResult<Vec<LandingPageRef>>;
}

#[derive(Clone)]
pub struct SqlRepository {
    pool: AnyPool,
}

impl SqlRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> DbResult<String> {
    serde_json::to_string(value).map_err(|err| sqlx::Error::Encode(Box::new(err)))
}

#[async_trait]
impl Repository for SqlRepository {
    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_admin_by_username(&self, username: &str) -> DbResult<Option<AdminUser>> {
        sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password_hash, role, stripe_customer_id
             FROM admin_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_admin_if_absent(&self, user: &NewAdminUser) -> DbResult<bool> {
        let result = sqlx::query(
            "INSERT INTO admin_users (username, password_hash, role, stripe_customer_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.stripe_customer_id.clone())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_admins(&self) -> DbResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&self.pool)
            .await
    }

    async fn insert_contact(&self, submission: &NewContactSubmission) -> DbResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO contact_submissions (name, email, phone, message, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(submission.phone.clone())
        .bind(&submission.message)
        .bind(submission.created_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_contacts(&self) -> DbResult<Vec<ContactSubmission>> {
        sqlx::query_as::<_, ContactSubmission>(
            "SELECT id, name, email, phone, message, created_at
             FROM contact_submissions ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn insert_billing_event(&self, event: &NewBillingEvent) -> DbResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO billing_events (customer_id, event_type, details, timestamp)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(event.customer_id.clone())
        .bind(&event.event_type)
        .bind(&event.details)
        .bind(event.timestamp)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_billing_events(&self) -> DbResult<Vec<BillingEvent>> {
        sqlx::query_as::<_, BillingEvent>(
            "SELECT id, customer_id, event_type, details, timestamp
             FROM billing_events ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn global_content(&self) -> DbResult<Vec<GlobalContent>> {
        sqlx::query_as::<_, GlobalContent>("SELECT key, value FROM global_content ORDER BY key")
            .fetch_all(&self.pool)
            .await
    }

    async fn insert_global_if_absent(&self, key: &str, value: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "INSERT INTO global_content (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_location(&self, name: &str) -> DbResult<Option<LocationContent>> {
        sqlx::query_as::<_, LocationContent>(
            "SELECT id, name FROM location_content WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn ensure_location(&self, name: &str) -> DbResult<LocationContent> {
        sqlx::query("INSERT INTO location_content (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;
        self.find_location(name)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn find_service(&self, slug: &str, location_id: i64) -> DbResult<Option<ServiceContent>> {
        sqlx::query_as::<_, ServiceContent>(
            "SELECT id, location_id, name, slug, description, hero_image_url, cta_text,
                    testimonials, faqs
             FROM service_content WHERE slug = $1 AND location_id = $2",
        )
        .bind(slug)
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_service_if_absent(&self, service: &NewServiceContent) -> DbResult<bool> {
        let result = sqlx::query(
            "INSERT INTO service_content
                (location_id, name, slug, description, hero_image_url, cta_text, testimonials, faqs)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (location_id, slug) DO NOTHING",
        )
        .bind(service.location_id)
        .bind(&service.name)
        .bind(&service.slug)
        .bind(&service.description)
        .bind(service.hero_image_url.clone())
        .bind(service.cta_text.clone())
        .bind(to_json(&service.testimonials)?)
        .bind(to_json(&service.faqs)?)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_landing_pages(&self) -> DbResult<Vec<LandingPageRef>> {
        sqlx::query_as::<_, LandingPageRef>(
            "SELECT s.slug AS slug, l.name AS location
             FROM service_content s
             JOIN location_content l ON l.id = s.location_id
             ORDER BY l.name, s.slug",
        )
        .fetch_all(&self.pool)
        .await
    }
}
