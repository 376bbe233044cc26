//! Startup seeding of site content and the initial admin account.
//!
//! Every step is idempotent: rows that already exist are left untouched, so
//! restarting the server never duplicates an admin or a landing page.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::models::{Faq, NewAdminUser, NewServiceContent, Testimonial};
use super::Repository;
use crate::auth::service::hash_password;
use crate::auth::AuthError;
use crate::config::AdminSeed;

pub const DEFAULT_SITE_NAME: &str = "TruView Glass";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error while seeding: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Could not hash seed admin password: {0}")]
    Password(#[from] AuthError),

    #[error("Could not read content seed {path}: {reason}")]
    ContentFile { path: String, reason: String },
}

/// Landing-page content loaded from a JSON seed file.
#[derive(Debug, Default, Deserialize)]
pub struct ContentSeed {
    #[serde(default)]
    pub global: BTreeMap<String, String>,
    #[serde(default)]
    pub locations: Vec<LocationSeed>,
}

#[derive(Debug, Deserialize)]
pub struct LocationSeed {
    pub name: String,
    #[serde(default)]
    pub services: Vec<ServiceSeed>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceSeed {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub hero_image_url: Option<String>,
    pub cta_text: Option<String>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
}

/// Inserts `site_name` when the global content table is empty.
pub async fn seed_global_defaults(repo: &dyn Repository) -> Result<(), SeedError> {
    if repo.global_content().await?.is_empty() {
        repo.insert_global_if_absent("site_name", DEFAULT_SITE_NAME)
            .await?;
        info!("Database seeded with default global_content data");
    }
    Ok(())
}

/// Creates the configured admin unless that username already exists.
pub async fn seed_admin(repo: &dyn Repository, seed: &AdminSeed) -> Result<bool, SeedError> {
    if repo.find_admin_by_username(&seed.username).await?.is_some() {
        return Ok(false);
    }

    let password_hash = hash_password(&seed.password).await?;
    let inserted = repo
        .insert_admin_if_absent(&NewAdminUser {
            username: seed.username.clone(),
            password_hash,
            role: seed.role.as_str().to_string(),
            stripe_customer_id: None,
        })
        .await?;

    if inserted {
        info!(username = %seed.username, role = %seed.role, "Admin user ensured");
    }
    Ok(inserted)
}

pub async fn load_content_seed(path: &str) -> Result<ContentSeed, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| SeedError::ContentFile {
            path: path.to_string(),
            reason: err.to_string(),
        })?;
    serde_json::from_str(&raw).map_err(|err| SeedError::ContentFile {
        path: path.to_string(),
        reason: err.to_string(),
    })
}

/// Inserts global keys, locations and services that are not present yet.
/// Returns the number of services created.
pub async fn apply_content_seed(
    repo: &dyn Repository,
    content: &ContentSeed,
) -> Result<usize, SeedError> {
    for (key, value) in &content.global {
        repo.insert_global_if_absent(key, value).await?;
    }

    let mut created = 0;
    for location_seed in &content.locations {
        let location = repo.ensure_location(&location_seed.name).await?;
        for service in &location_seed.services {
            let inserted = repo
                .insert_service_if_absent(&NewServiceContent {
                    location_id: location.id,
                    name: service.name.clone(),
                    slug: service.slug.clone(),
                    description: service.description.clone(),
                    hero_image_url: service.hero_image_url.clone(),
                    cta_text: service.cta_text.clone(),
                    testimonials: service.testimonials.clone(),
                    faqs: service.faqs.clone(),
                })
                .await?;
            if inserted {
                created += 1;
            }
        }
    }

    info!(services = created, "Landing content seeded");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_seed_tolerates_missing_sections() {
        let seed: ContentSeed = serde_json::from_str(
            r#"{ "locations": [ { "name": "Denver", "services": [
                { "name": "Windshield Repair", "slug": "windshield-repair",
                  "description": "{{service}} in {{location}}" } ] } ] }"#,
        )
        .unwrap();

        assert!(seed.global.is_empty());
        assert_eq!(seed.locations[0].services[0].slug, "windshield-repair");
        assert!(seed.locations[0].services[0].faqs.is_empty());
    }
}
