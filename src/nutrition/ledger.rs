//! Merges resolved food items into the day's meal-type aggregate.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::record::{NutritionRecord, ResolutionSource};
use super::repo;
use super::repo_types::DietaryLog;
use crate::dates::DayWindow;

/// One resolved item to be recorded for a user.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub user_id: Uuid,
    pub meal_type: String,
    pub record: NutritionRecord,
    pub source: ResolutionSource,
    pub image_url: Option<String>,
    pub at: OffsetDateTime,
}

/// Create-or-accumulate for `(user, meal type, day of entry.at)`.
///
/// Implementations must be atomic per key: concurrent calls for the same key
/// end with one aggregate whose total is the sum of all recorded calories.
#[async_trait]
pub trait MealLedger: Send + Sync {
    async fn record(&self, entry: LedgerEntry) -> anyhow::Result<DietaryLog>;
}

pub struct PgLedger {
    db: PgPool,
}

impl PgLedger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealLedger for PgLedger {
    async fn record(&self, entry: LedgerEntry) -> anyhow::Result<DietaryLog> {
        let window = DayWindow::containing(entry.at);
        let mut tx = self.db.begin().await.context("begin tx")?;
        let log = repo::upsert_log_tx(
            &mut tx,
            entry.user_id,
            &entry.meal_type,
            &window,
            entry.record.calories,
        )
        .await?;
        repo::insert_food_entry_tx(&mut tx, log.id, &entry).await?;
        let food_items = repo::list_entries_tx(&mut tx, log.id).await?;
        tx.commit().await.context("commit tx")?;

        debug!(log_id = %log.id, total = log.total_calories, items = food_items.len(), "ledger updated");
        Ok(DietaryLog { log, food_items })
    }
}
