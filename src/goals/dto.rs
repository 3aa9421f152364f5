use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::WeightGoal;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub start_weight: f64,
    pub target_weight: f64,
    #[serde(default)]
    pub current_weight: Option<f64>,
    pub goal_type: String,
    #[serde(with = "crate::dates::iso_date")]
    pub target_date: Date,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[serde(default)]
    pub current_weight: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: WeightGoal,
    pub progress: f64,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn target_date_reads_calendar_date() {
        let req: CreateGoalRequest = serde_json::from_str(
            r#"{"startWeight":82,"targetWeight":75,"goalType":"lose","targetDate":"2024-06-30"}"#,
        )
        .unwrap();
        assert_eq!(req.target_date, date!(2024 - 06 - 30));
        assert_eq!(req.current_weight, None);
    }

    #[test]
    fn target_date_rejects_datetime() {
        let res = serde_json::from_str::<CreateGoalRequest>(
            r#"{"startWeight":82,"targetWeight":75,"goalType":"lose","targetDate":"2024-06-30T00:00:00Z"}"#,
        );
        assert!(res.is_err());
    }
}
