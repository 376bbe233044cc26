//! Spawns the full application against a throwaway SQLite file with
//! recording fakes in place of every provider.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Response};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;
use truview_adapters::testing::{RecordingMailer, RecordingPayments, RecordingSms, StaticCaptcha};
use truview_backend::{
    auth::Role,
    build_router,
    config::{AdminSeed, Config},
    database::{
        self,
        models::{
            AdminUser, BillingEvent, ContactSubmission, GlobalContent, LandingPageRef,
            LocationContent, NewAdminUser, NewBillingEvent, NewContactSubmission,
            NewServiceContent, ServiceContent,
        },
        seed, DbResult, Repository, SqlRepository,
    },
    services::integrations::Integrations,
    state::{bootstrap, AppState},
};

pub const ADMIN: (&str, &str) = ("owner", "correct horse battery");
pub const MANAGER: (&str, &str) = ("frontdesk", "staple paper clip");
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

const CONTENT_SEED: &str = r#"{
  "global": { "tagline": "Clear glass, clear roads." },
  "locations": [
    {
      "name": "Fort Collins",
      "services": [
        {
          "name": "Windshield Repair",
          "slug": "windshield-repair",
          "description": "Same-day {{service}} for {{location}} drivers.",
          "hero_image_url": "/img/chip.jpg');color:red",
          "cta_text": "Book a repair",
          "testimonials": [{ "author": "Sam", "quote": "Good as new." }],
          "faqs": [{ "question": "Do you come to me?", "answer": "Anywhere in town." }]
        }
      ]
    }
  ]
}"#;

pub struct TestApp {
    pub base: String,
    pub client: Client,
    pub repo: Arc<dyn Repository>,
    pub mailer: Arc<RecordingMailer>,
    pub sms: Arc<RecordingSms>,
    pub payments: Arc<RecordingPayments>,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, (username, password): (&str, &str)) -> Response {
        self.post_form(
            "/admin/login",
            &[("username", username), ("password", password)],
        )
        .await
    }

    pub async fn post_webhook(&self, payload: &str, signature: Option<String>) -> Response {
        let mut request = self
            .client
            .post(self.url("/webhook"))
            .header("content-type", "application/json")
            .body(payload.to_string());
        if let Some(signature) = signature {
            request = request.header("stripe-signature", signature);
        }
        request.send().await.unwrap()
    }
}

pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn signed(payload: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    truview_adapters::stripe::signature_header(WEBHOOK_SECRET, now, payload.as_bytes()).unwrap()
}

pub fn event_payload(id: &str, event_type: &str, object: serde_json::Value) -> String {
    json!({
        "id": id,
        "type": event_type,
        "created": chrono::Utc::now().timestamp(),
        "data": { "object": object }
    })
    .to_string()
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(true).await
}

fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.database_url = format!("sqlite://{}?mode=rwc", dir.path().join("cms.db").display());
    config.base_url = "https://truview.test".to_string();
    config.public_dir = dir.path().display().to_string();
    config.stripe.webhook_secret = Some(WEBHOOK_SECRET.to_string());
    config.stripe.price_id = Some("price_basic".to_string());
    config.email.notify_to = Some("leads@truview.test".to_string());
    config.sms.notify_to = Some("+15550001111".to_string());
    config
}

pub async fn spawn_app_with(captcha_accepts: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("content.json");
    std::fs::write(&seed_path, CONTENT_SEED).unwrap();

    let mut config = test_config(&dir);
    config.admin_seed = Some(AdminSeed {
        username: ADMIN.0.to_string(),
        password: ADMIN.1.to_string(),
        role: Role::Admin,
    });
    config.content_seed_path = Some(seed_path.display().to_string());

    let (pool, dialect) = database::connect(&config.database_url, 4).await.unwrap();
    database::ensure_schema(&pool, dialect).await.unwrap();
    let repo: Arc<dyn Repository> = Arc::new(SqlRepository::new(pool));
    bootstrap(repo.as_ref(), &config).await.unwrap();
    seed::seed_admin(
        repo.as_ref(),
        &AdminSeed {
            username: MANAGER.0.to_string(),
            password: MANAGER.1.to_string(),
            role: Role::Manager,
        },
    )
    .await
    .unwrap();

    serve(dir, config, repo, captcha_accepts).await
}

/// Runs the app on a repository whose every call fails.
pub async fn spawn_app_without_database() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    serve(dir, config, Arc::new(UnavailableRepository), true).await
}

async fn serve(
    dir: TempDir,
    config: Config,
    repo: Arc<dyn Repository>,
    captcha_accepts: bool,
) -> TestApp {
    let mailer = Arc::new(RecordingMailer::default());
    let sms = Arc::new(RecordingSms::default());
    let payments = Arc::new(RecordingPayments::default());
    let integrations = Integrations {
        payments: payments.clone(),
        mailer: mailer.clone(),
        sms: sms.clone(),
        captcha: Arc::new(StaticCaptcha {
            accept: captcha_accepts,
        }),
    };

    let state = AppState::new(config, repo.clone(), integrations).unwrap();
    let app = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        base: format!("http://{addr}"),
        client: client(),
        repo,
        mailer,
        sms,
        payments,
        _dir: dir,
    }
}

pub struct UnavailableRepository;

fn closed<T>() -> DbResult<T> {
    Err(sqlx::Error::PoolClosed)
}

#[async_trait]
impl Repository for UnavailableRepository {
    async fn ping(&self) -> DbResult<()> {
        closed()
    }
    async fn find_admin_by_username(&self, _username: &str) -> DbResult<Option<AdminUser>> {
        closed()
    }
    async fn insert_admin_if_absent(&self, _user: &NewAdminUser) -> DbResult<bool> {
        closed()
    }
    async fn count_admins(&self) -> DbResult<i64> {
        closed()
    }
    async fn insert_contact(&self, _submission: &NewContactSubmission) -> DbResult<i64> {
        closed()
    }
    async fn list_contacts(&self) -> DbResult<Vec<ContactSubmission>> {
        closed()
    }
    async fn insert_billing_event(&self, _event: &NewBillingEvent) -> DbResult<i64> {
        closed()
    }
    async fn list_billing_events(&self) -> DbResult<Vec<BillingEvent>> {
        closed()
    }
    async fn global_content(&self) -> DbResult<Vec<GlobalContent>> {
        closed()
    }
    async fn insert_global_if_absent(&self, _key: &str, _value: &str) -> DbResult<bool> {
        closed()
    }
    async fn find_location(&self, _name: &str) -> DbResult<Option<LocationContent>> {
        closed()
    }
    async fn ensure_location(&self, _name: &str) -> DbResult<LocationContent> {
        closed()
    }
    async fn find_service(&self, _slug: &str, _location_id: i64) -> DbResult<Option<ServiceContent>> {
        closed()
    }
    async fn insert_service_if_absent(&self, _service: &NewServiceContent) -> DbResult<bool> {
        closed()
    }
    async fn list_landing_pages(&self) -> DbResult<Vec<LandingPageRef>> {
        closed()
    }
}
