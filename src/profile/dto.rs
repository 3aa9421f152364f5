use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    #[serde(default)]
    pub gender: Option<String>,
    pub activity_level: String,
    pub weekly_exercise: i32,
    #[serde(default)]
    pub target_weight: Option<f64>,
    #[serde(default)]
    pub health_goals: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub bmi: f64,
}
