use std::{str::FromStr, time::Duration};

use crate::ai::{with_timeout, CompletionClient, CompletionError};
use crate::error::AppError;
use crate::exercise::repo_types::ExerciseLog;
use crate::nutrition::repo_types::DietaryLogRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightDirection {
    Increase,
    Decrease,
}

impl WeightDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightDirection::Increase => "increase",
            WeightDirection::Decrease => "decrease",
        }
    }

    pub fn target_label(&self) -> &'static str {
        match self {
            WeightDirection::Increase => "weight gain",
            WeightDirection::Decrease => "weight loss",
        }
    }
}

impl FromStr for WeightDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increase" => Ok(WeightDirection::Increase),
            "decrease" => Ok(WeightDirection::Decrease),
            _ => Err(AppError::bad_request(
                "weightGoal must be \"increase\" or \"decrease\"",
            )),
        }
    }
}

/// Recent intake and expenditure next to the user's BMR.
#[derive(Debug, Clone, PartialEq)]
pub struct Habits {
    pub bmr: i32,
    pub avg_intake: i32,
    pub avg_burned: i32,
}

/// Mean `total_calories` per log, 0 without logs.
pub fn average_intake(logs: &[DietaryLogRow]) -> i32 {
    if logs.is_empty() {
        return 0;
    }
    let total: i64 = logs.iter().map(|l| l.total_calories as i64).sum();
    (total as f64 / logs.len() as f64).round() as i32
}

/// Mean calories burned per entry, a missing figure counting as 0.
pub fn average_burned(logs: &[ExerciseLog]) -> i32 {
    if logs.is_empty() {
        return 0;
    }
    let total: i64 = logs
        .iter()
        .map(|l| l.calories_burned.unwrap_or(0) as i64)
        .sum();
    (total as f64 / logs.len() as f64).round() as i32
}

/// Runs both prompts concurrently; either failing fails the pair.
pub async fn complete_pair(
    client: &dyn CompletionClient,
    limit: Duration,
    first: &str,
    second: &str,
) -> Result<(String, String), CompletionError> {
    tokio::try_join!(
        with_timeout(limit, client.complete_text(first)),
        with_timeout(limit, client.complete_text(second)),
    )
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};
    use uuid::Uuid;

    use super::*;
    use crate::nutrition::resolver::tests::ScriptedClient;

    fn log(kcal: i32) -> DietaryLogRow {
        let at = datetime!(2024-01-01 00:00 UTC);
        DietaryLogRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            meal_type: "LUNCH".into(),
            log_date: date!(2024-01-01),
            date: at,
            total_calories: kcal,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn workout(kcal: Option<i32>) -> ExerciseLog {
        let at = datetime!(2024-01-01 07:00 UTC);
        ExerciseLog {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            exercise_type: "swim".into(),
            duration: 40,
            intensity: "MODERATE".into(),
            calories_burned: kcal,
            notes: None,
            date: at,
            created_at: at,
        }
    }

    #[test]
    fn averages_round_and_handle_empty() {
        assert_eq!(average_intake(&[]), 0);
        assert_eq!(average_intake(&[log(500), log(701)]), 601);
        assert_eq!(average_burned(&[]), 0);
        assert_eq!(average_burned(&[workout(Some(300)), workout(None)]), 150);
    }

    #[test]
    fn weight_direction_parsing() {
        assert_eq!(
            "Decrease".parse::<WeightDirection>().unwrap(),
            WeightDirection::Decrease
        );
        assert_eq!(WeightDirection::Increase.target_label(), "weight gain");
        assert!("maintain".parse::<WeightDirection>().is_err());
    }

    #[tokio::test]
    async fn pair_returns_both_answers() {
        let client = ScriptedClient::new(["lift heavy", "run easy"]);
        let (a, b) = complete_pair(&client, Duration::from_secs(5), "strength", "cardio")
            .await
            .unwrap();
        assert_eq!(a, "lift heavy");
        assert_eq!(b, "run easy");
        assert_eq!(client.text_prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pair_fails_when_one_call_fails() {
        let client = ScriptedClient::failing();
        let res = complete_pair(&client, Duration::from_secs(5), "strength", "cardio").await;
        assert!(res.is_err());
    }
}
