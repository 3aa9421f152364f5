use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_weight: f64,
    pub target_weight: f64,
    pub current_weight: f64,
    pub goal_type: String,
    pub status: String,
    #[serde(with = "crate::dates::iso_date")]
    pub target_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
