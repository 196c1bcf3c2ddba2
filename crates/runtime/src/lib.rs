use anyhow::Result;
use axum::Router;
use ourstreet_config::AppConfig;
use ourstreet_database::initialize_database;
use ourstreet_gateway::{build_router, AppState};
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. `RUST_LOG` overrides the `info` default.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub state: AppState,
    allowed_origins: Vec<String>,
}

impl BackendServices {
    /// Connect to the database, apply migrations and wire the HTTP services.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database).await?;
        let state = AppState::new(db_pool.clone(), config);

        info!(agent = %state.agent().agent_id, "backend services ready");

        Ok(Self {
            db_pool,
            state,
            allowed_origins: config.http.allowed_origins.clone(),
        })
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.allowed_origins)
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
