//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Rows are decoded with `sqlx::FromRow`; the `New*`
//! structs carry the columns supplied on insert.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub stripe_customer_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub stripe_customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    /// Unix seconds.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct BillingEvent {
    pub id: i64,
    pub customer_id: Option<String>,
    pub event_type: String,
    /// Raw JSON of the processor's event object.
    pub details: String,
    /// Unix seconds at receipt.
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct NewBillingEvent {
    pub customer_id: Option<String>,
    pub event_type: String,
    pub details: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct GlobalContent {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LocationContent {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ServiceContent {
    pub id: i64,
    pub location_id: i64,
    pub name: String,
    pub slug: String,
    /// May contain `{{service}}` and `{{location}}` placeholders.
    pub description: String,
    pub hero_image_url: Option<String>,
    pub cta_text: Option<String>,
    /// JSON list of [`Testimonial`].
    pub testimonials: String,
    /// JSON list of [`Faq`].
    pub faqs: String,
}

#[derive(Debug, Clone)]
pub struct NewServiceContent {
    pub location_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub hero_image_url: Option<String>,
    pub cta_text: Option<String>,
    pub testimonials: Vec<Testimonial>,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub author: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// A (service, location) pair that has a landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LandingPageRef {
    pub slug: String,
    pub location: String,
}
