use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub exercise_type: String,
    /// Minutes.
    pub duration: i32,
    pub intensity: String,
    pub calories_burned: Option<i32>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
