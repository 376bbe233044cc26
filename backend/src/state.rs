//! Shared application state handed to every handler, and the startup
//! bootstrap that seeds the database before the server accepts requests.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::database::{self, seed, Repository, SqlRepository};
use crate::errors::StartupError;
use crate::middleware::LoginRateLimiter;
use crate::services::integrations::Integrations;
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repo: Arc<dyn Repository>,
    pub views: Arc<Views>,
    pub integrations: Integrations,
    pub login_limiter: Arc<LoginRateLimiter>,
}

impl AppState {
    pub fn new(
        config: Config,
        repo: Arc<dyn Repository>,
        integrations: Integrations,
    ) -> Result<Self, StartupError> {
        let login_limiter = LoginRateLimiter::new(config.login_max_attempts, config.login_window);

        Ok(Self {
            config: Arc::new(config),
            repo,
            views: Arc::new(Views::new()?),
            integrations,
            login_limiter: Arc::new(login_limiter),
        })
    }

    /// Connects to the database, ensures the schema, seeds defaults and wires
    /// up the provider clients described by `config`.
    pub async fn from_config(config: Config) -> Result<Self, StartupError> {
        let (pool, dialect) =
            database::connect(&config.database_url, config.database_max_connections).await?;
        database::ensure_schema(&pool, dialect).await?;

        let repo: Arc<dyn Repository> = Arc::new(SqlRepository::new(pool));
        bootstrap(repo.as_ref(), &config).await?;

        let integrations = Integrations::from_config(&config);
        Self::new(config, repo, integrations)
    }
}

/// Runs every idempotent seeding step the configuration asks for.
pub async fn bootstrap(repo: &dyn Repository, config: &Config) -> Result<(), StartupError> {
    seed::seed_global_defaults(repo).await?;

    if let Some(admin) = &config.admin_seed {
        seed::seed_admin(repo, admin).await?;
    }

    if let Some(path) = &config.content_seed_path {
        info!(%path, "Loading landing content seed");
        let content = seed::load_content_seed(path).await?;
        seed::apply_content_seed(repo, &content).await?;
    }

    Ok(())
}
