//! HTML and XML rendering.
//!
//! Templates are compiled into the binary and loaded into a single
//! `minijinja` environment at startup. `.html` and `.xml` templates are
//! auto-escaped. Every page receives a [`Chrome`] value carrying the site-wide
//! content, the logged-in user and any pending flash message.

use std::collections::BTreeMap;

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;
use tower_sessions::Session;

use crate::auth::{SessionUser, SESSION_USER_KEY};
use crate::errors::AppError;
use crate::state::AppState;

const FLASH_KEY: &str = "flash";

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("about.html", include_str!("../../templates/about.html")),
    ("contact.html", include_str!("../../templates/contact.html")),
    ("success.html", include_str!("../../templates/success.html")),
    ("landing.html", include_str!("../../templates/landing.html")),
    ("not_found.html", include_str!("../../templates/not_found.html")),
    ("admin_login.html", include_str!("../../templates/admin_login.html")),
    ("admin_dashboard.html", include_str!("../../templates/admin_dashboard.html")),
    ("admin_contacts.html", include_str!("../../templates/admin_contacts.html")),
    (
        "admin_billing_events.html",
        include_str!("../../templates/admin_billing_events.html"),
    ),
    (
        "admin_billing_analytics.html",
        include_str!("../../templates/admin_billing_analytics.html"),
    ),
    ("sitemap.xml", include_str!("../../templates/sitemap.xml")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_filter("datetime", format_timestamp);
        Ok(Self { env })
    }

    pub fn render_string<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        Ok(Html(self.render_string(name, ctx)?))
    }
}

/// Formats unix seconds as `YYYY-MM-DD HH:MM UTC`.
fn format_timestamp(seconds: i64) -> String {
    chrono::DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

/// Per-request values shared by every page layout.
#[derive(Debug, Serialize)]
pub struct Chrome {
    pub site: BTreeMap<String, String>,
    pub user: Option<SessionUser>,
    pub flash: Option<String>,
}

pub async fn chrome(state: &AppState, session: &Session) -> Result<Chrome, AppError> {
    let site = state
        .repo
        .global_content()
        .await?
        .into_iter()
        .map(|row| (row.key, row.value.unwrap_or_default()))
        .collect();

    Ok(Chrome {
        site,
        user: session.get::<SessionUser>(SESSION_USER_KEY).await?,
        flash: take_flash(session).await?,
    })
}

pub async fn set_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(FLASH_KEY, message.into()).await
}

/// Removes and returns the pending flash message, so it renders once.
pub async fn take_flash(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(FLASH_KEY).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn all_templates_compile() {
        assert!(Views::new().is_ok());
    }

    #[test]
    fn page_content_is_html_escaped() {
        let views = Views::new().unwrap();
        let chrome = Chrome {
            site: BTreeMap::from([("site_name".to_string(), "TruView Glass".to_string())]),
            user: None,
            flash: Some("<b>hi</b>".to_string()),
        };
        let html = views
            .render_string("about.html", context! { chrome => chrome })
            .unwrap();
        assert!(html.contains("TruView Glass"));
        assert!(html.contains("&lt;b&gt;hi"));
        assert!(!html.contains("<b>hi"));
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00 UTC");
    }
}
