use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Per-user, per-day, per-meal-type running total.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DietaryLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: String,
    #[serde(with = "crate::dates::iso_date")]
    pub log_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub total_calories: i32,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One resolved food item inside a dietary log.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dietary_log_id: Uuid,
    pub food_name: String,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub serving_size: String,
    pub image_url: Option<String>,
    pub ai_predicted: bool,
    pub source: String,
    pub meal_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A dietary log with its food items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietaryLog {
    #[serde(flatten)]
    pub log: DietaryLogRow,
    pub food_items: Vec<FoodEntryRow>,
}

/// Pairs each log with its items, preserving the order of `logs`.
pub fn attach_items(logs: Vec<DietaryLogRow>, entries: Vec<FoodEntryRow>) -> Vec<DietaryLog> {
    let mut by_log: std::collections::HashMap<Uuid, Vec<FoodEntryRow>> =
        std::collections::HashMap::new();
    for e in entries {
        by_log.entry(e.dietary_log_id).or_default().push(e);
    }
    logs.into_iter()
        .map(|log| DietaryLog {
            food_items: by_log.remove(&log.id).unwrap_or_default(),
            log,
        })
        .collect()
}
