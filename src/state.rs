use std::sync::Arc;

use crate::config::AppConfig;
use crate::users::{memory::InMemoryUserStore, repo::PgUserStore, repo::UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects to Postgres and prepares the schema, or falls back to the
    /// in-memory store when no database URL is configured.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn UserStore> = match config.database_url.as_deref() {
            Some(url) => {
                let pg = PgUserStore::connect(url, config.db_max_connections).await?;
                pg.ensure_schema().await?;
                Arc::new(pg)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; users are kept in memory only");
                Arc::new(InMemoryUserStore::new())
            }
        };
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(AppConfig::in_memory()),
        )
    }
}
