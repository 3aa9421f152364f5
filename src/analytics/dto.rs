use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::AppError;

pub const DEFAULT_DAYS: i64 = 30;
pub const MAX_DAYS: i64 = 365;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<i64>,
}

impl AnalyticsQuery {
    pub fn days(&self) -> Result<i64, AppError> {
        match self.days.unwrap_or(DEFAULT_DAYS) {
            d @ 1..=MAX_DAYS => Ok(d),
            _ => Err(AppError::bad_request(format!(
                "days must be between 1 and {MAX_DAYS}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPoint {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub meal_type: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePoint {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub calories_burned: i64,
    pub duration: i64,
}
