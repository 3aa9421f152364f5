use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::ledger::LedgerEntry;
use super::repo_types::{DietaryLogRow, FoodEntryRow};
use crate::dates::DayWindow;

const LOG_COLUMNS: &str =
    "id, user_id, meal_type, log_date, date, total_calories, notes, created_at, updated_at";
const ENTRY_COLUMNS: &str = "id, user_id, dietary_log_id, food_name, calories, protein, carbs, \
     fats, serving_size, image_url, ai_predicted, source, meal_type, created_at";

/// Creates the day's log for the key or adds `calories` to it, in one statement.
pub async fn upsert_log_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    meal_type: &str,
    window: &DayWindow,
    calories: i32,
) -> anyhow::Result<DietaryLogRow> {
    let sql = format!(
        r#"
        INSERT INTO dietary_logs (user_id, meal_type, log_date, date, total_calories)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, meal_type, log_date)
        DO UPDATE SET total_calories = dietary_logs.total_calories + EXCLUDED.total_calories,
                      updated_at = now()
        RETURNING {LOG_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DietaryLogRow>(&sql)
        .bind(user_id)
        .bind(meal_type)
        .bind(window.date)
        .bind(window.start)
        .bind(calories)
        .fetch_one(&mut **tx)
        .await
        .context("upsert dietary log")?;
    Ok(row)
}

pub async fn insert_food_entry_tx(
    tx: &mut Transaction<'_, Postgres>,
    dietary_log_id: Uuid,
    entry: &LedgerEntry,
) -> anyhow::Result<FoodEntryRow> {
    let sql = format!(
        r#"
        INSERT INTO food_entries (user_id, dietary_log_id, food_name, calories, protein, carbs,
                                  fats, serving_size, image_url, ai_predicted, source, meal_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10, $11)
        RETURNING {ENTRY_COLUMNS}
        "#
    );
    let rec = &entry.record;
    let row = sqlx::query_as::<_, FoodEntryRow>(&sql)
        .bind(entry.user_id)
        .bind(dietary_log_id)
        .bind(&rec.food_name)
        .bind(rec.calories)
        .bind(rec.protein)
        .bind(rec.carbs)
        .bind(rec.fats)
        .bind(&rec.serving_size)
        .bind(entry.image_url.as_deref())
        .bind(entry.source.as_str())
        .bind(&entry.meal_type)
        .fetch_one(&mut **tx)
        .await
        .context("insert food entry")?;
    Ok(row)
}

pub async fn list_entries_tx(
    tx: &mut Transaction<'_, Postgres>,
    dietary_log_id: Uuid,
) -> anyhow::Result<Vec<FoodEntryRow>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM food_entries WHERE dietary_log_id = $1 ORDER BY created_at ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, FoodEntryRow>(&sql)
        .bind(dietary_log_id)
        .fetch_all(&mut **tx)
        .await
        .context("list food entries")?;
    Ok(rows)
}

/// Logs whose day starts within `[from, to)`, oldest first.
pub async fn list_logs_between(
    db: &PgPool,
    user_id: Uuid,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> anyhow::Result<Vec<DietaryLogRow>> {
    let sql = format!(
        "SELECT {LOG_COLUMNS} FROM dietary_logs \
         WHERE user_id = $1 AND date >= $2 AND date < $3 ORDER BY date ASC, meal_type ASC"
    );
    let rows = sqlx::query_as::<_, DietaryLogRow>(&sql)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await
        .context("list dietary logs")?;
    Ok(rows)
}

pub async fn list_logs_since(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> anyhow::Result<Vec<DietaryLogRow>> {
    let sql = format!(
        "SELECT {LOG_COLUMNS} FROM dietary_logs \
         WHERE user_id = $1 AND date >= $2 ORDER BY date ASC, meal_type ASC"
    );
    let rows = sqlx::query_as::<_, DietaryLogRow>(&sql)
        .bind(user_id)
        .bind(since)
        .fetch_all(db)
        .await
        .context("list dietary logs since")?;
    Ok(rows)
}

pub async fn list_all_logs(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<DietaryLogRow>> {
    let sql = format!(
        "SELECT {LOG_COLUMNS} FROM dietary_logs WHERE user_id = $1 ORDER BY date DESC, meal_type ASC"
    );
    let rows = sqlx::query_as::<_, DietaryLogRow>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list all dietary logs")?;
    Ok(rows)
}

/// Food items of the given logs, in insertion order.
pub async fn list_entries_for_logs(
    db: &PgPool,
    log_ids: &[Uuid],
) -> anyhow::Result<Vec<FoodEntryRow>> {
    if log_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM food_entries \
         WHERE dietary_log_id = ANY($1) ORDER BY created_at ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, FoodEntryRow>(&sql)
        .bind(log_ids)
        .fetch_all(db)
        .await
        .context("list food entries for logs")?;
    Ok(rows)
}
