use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    /// Centimetres.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub gender: Option<String>,
    pub activity_level: String,
    pub weekly_exercise: i32,
    pub target_weight: Option<f64>,
    pub health_goals: Vec<String>,
    pub bmi: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
