use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::exercise::repo_types::ExerciseLog;
use crate::nutrition::repo_types::DietaryLog;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub date: Option<String>,
}

/// Everything logged on one day.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub dietary_logs: Vec<DietaryLog>,
    pub exercise_logs: Vec<ExerciseLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub id: Uuid,
    pub meal_type: String,
    pub total_calories: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub exercise_type: String,
    pub duration: i32,
    pub calories_burned: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOverview {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub dietary_logs: Vec<MealSummary>,
    pub exercise_logs: Vec<ExerciseSummary>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HistoryResponse {
    Day(DayDetail),
    Overview(Vec<DayOverview>),
}
