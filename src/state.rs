use crate::ai::{CompletionClient, GeminiClient};
use crate::config::AppConfig;
use crate::nutrition::ledger::{MealLedger, PgLedger};
use crate::storage::{S3Storage, StorageClient};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub completion: Arc<dyn CompletionClient>,
    pub ledger: Arc<dyn MealLedger>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        let storage =
            Arc::new(S3Storage::new(&config.storage, "us-east-1").await?) as Arc<dyn StorageClient>;
        let completion =
            Arc::new(GeminiClient::new(&config.gemini)) as Arc<dyn CompletionClient>;
        let ledger = Arc::new(PgLedger::new(db.clone())) as Arc<dyn MealLedger>;

        Ok(Self::from_parts(db, config, storage, completion, ledger))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        completion: Arc<dyn CompletionClient>,
        ledger: Arc<dyn MealLedger>,
    ) -> Self {
        Self {
            db,
            config,
            storage,
            completion,
            ledger,
        }
    }
}
