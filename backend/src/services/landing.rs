//! Assembles "service × location" landing pages from stored content.

use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::database::models::{Faq, LocationContent, ServiceContent, Testimonial};
use crate::database::{DbResult, Repository};

pub const SERVICE_TOKEN: &str = "{{service}}";
pub const LOCATION_TOKEN: &str = "{{location}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandingPage {
    pub service: String,
    pub location: String,
    pub slug: String,
    pub description: String,
    pub hero_image_url: Option<String>,
    pub cta_text: Option<String>,
    pub testimonials: Vec<Testimonial>,
    pub faqs: Vec<Faq>,
}

pub fn render_description(template: &str, service: &str, location: &str) -> String {
    template
        .replace(SERVICE_TOKEN, service)
        .replace(LOCATION_TOKEN, location)
}

fn decode_list<T: DeserializeOwned>(raw: &str, field: &str, slug: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        warn!(%slug, %field, error = %err, "Ignoring malformed landing content");
        Vec::new()
    })
}

pub fn build_page(location: &LocationContent, service: ServiceContent) -> LandingPage {
    LandingPage {
        description: render_description(&service.description, &service.name, &location.name),
        testimonials: decode_list(&service.testimonials, "testimonials", &service.slug),
        faqs: decode_list(&service.faqs, "faqs", &service.slug),
        location: location.name.clone(),
        service: service.name,
        slug: service.slug,
        hero_image_url: service.hero_image_url,
        cta_text: service.cta_text,
    }
}

/// Exact-match lookup of the location, then of the slug within it.
pub async fn resolve(
    repo: &dyn Repository,
    slug: &str,
    location_name: &str,
) -> DbResult<Option<LandingPage>> {
    let Some(location) = repo.find_location(location_name).await? else {
        return Ok(None);
    };
    let service = repo.find_service(slug, location.id).await?;
    Ok(service.map(|service| build_page(&location, service)))
}

/// Absolute landing page URL under `base`, with each segment percent-encoded.
pub fn landing_url(base: &str, slug: &str, location: &str) -> Option<Url> {
    let mut url = Url::parse(base).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["services", slug, location]);
    Some(url)
}

pub fn landing_path(slug: &str, location: &str) -> String {
    landing_url("http://localhost/", slug, location)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|| format!("/services/{slug}/{location}"))
}
