use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub weight_goal: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestions: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub recommendation1: String,
    pub recommendation2: String,
}
