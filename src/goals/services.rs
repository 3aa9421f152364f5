use std::str::FromStr;

use super::dto::{CreateGoalRequest, UpdateGoalRequest};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalType {
    Lose,
    Gain,
    Maintain,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Lose => "LOSE",
            GoalType::Gain => "GAIN",
            GoalType::Maintain => "MAINTAIN",
        }
    }

    /// Whether moving from `start` to `target` is this kind of goal.
    pub fn admits(&self, start: f64, target: f64) -> bool {
        match self {
            GoalType::Lose => target < start,
            GoalType::Gain => target > start,
            GoalType::Maintain => true,
        }
    }
}

impl FromStr for GoalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOSE" => Ok(GoalType::Lose),
            "GAIN" => Ok(GoalType::Gain),
            "MAINTAIN" => Ok(GoalType::Maintain),
            other => Err(AppError::bad_request(format!("Unknown goal type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Active,
    Completed,
    Abandoned,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "ACTIVE",
            GoalStatus::Completed => "COMPLETED",
            GoalStatus::Abandoned => "ABANDONED",
        }
    }
}

impl FromStr for GoalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(GoalStatus::Active),
            "COMPLETED" => Ok(GoalStatus::Completed),
            "ABANDONED" => Ok(GoalStatus::Abandoned),
            other => Err(AppError::bad_request(format!("Unknown goal status: {other}"))),
        }
    }
}

fn positive(v: f64, what: &str) -> Result<(), AppError> {
    if v > 0.0 {
        Ok(())
    } else {
        Err(AppError::bad_request(format!("{what} must be positive")))
    }
}

pub fn validate_create(req: &CreateGoalRequest) -> Result<GoalType, AppError> {
    positive(req.start_weight, "Start weight")?;
    positive(req.target_weight, "Target weight")?;
    if let Some(c) = req.current_weight {
        positive(c, "Current weight")?;
    }
    let goal_type: GoalType = req.goal_type.parse()?;
    if !goal_type.admits(req.start_weight, req.target_weight) {
        return Err(AppError::bad_request(format!(
            "Target weight does not match goal type {}",
            goal_type.as_str()
        )));
    }
    Ok(goal_type)
}

pub fn validate_update(req: &UpdateGoalRequest) -> Result<Option<GoalStatus>, AppError> {
    if let Some(c) = req.current_weight {
        positive(c, "Current weight")?;
    }
    req.status.as_deref().map(str::parse::<GoalStatus>).transpose()
}

/// Percent of the way from start to target, clamped to `[0, 100]`.
pub fn progress(start: f64, target: f64, current: f64) -> f64 {
    let span = start - target;
    if span == 0.0 {
        return 100.0;
    }
    let pct = (start - current) / span * 100.0;
    (pct.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn create(start: f64, target: f64, kind: &str) -> CreateGoalRequest {
        CreateGoalRequest {
            start_weight: start,
            target_weight: target,
            current_weight: None,
            goal_type: kind.into(),
            target_date: date!(2025-06-01),
        }
    }

    #[test]
    fn progress_towards_loss_and_gain() {
        assert_eq!(progress(90.0, 80.0, 85.0), 50.0);
        assert_eq!(progress(60.0, 70.0, 62.5), 25.0);
        assert_eq!(progress(90.0, 80.0, 80.0), 100.0);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(90.0, 80.0, 95.0), 0.0);
        assert_eq!(progress(90.0, 80.0, 75.0), 100.0);
        assert_eq!(progress(70.0, 70.0, 72.0), 100.0);
    }

    #[test]
    fn goal_type_must_match_direction() {
        assert_eq!(validate_create(&create(90.0, 80.0, "LOSE")).unwrap(), GoalType::Lose);
        assert!(validate_create(&create(80.0, 90.0, "lose")).is_err());
        assert_eq!(validate_create(&create(60.0, 65.0, "gain")).unwrap(), GoalType::Gain);
        assert!(validate_create(&create(70.0, 70.0, "GAIN")).is_err());
        assert_eq!(
            validate_create(&create(70.0, 70.0, "MAINTAIN")).unwrap(),
            GoalType::Maintain
        );
        assert!(validate_create(&create(70.0, 60.0, "BULK")).is_err());
    }

    #[test]
    fn update_status_is_parsed() {
        let req = UpdateGoalRequest {
            current_weight: Some(82.0),
            status: Some("completed".into()),
        };
        assert_eq!(validate_update(&req).unwrap(), Some(GoalStatus::Completed));
        assert_eq!(validate_update(&UpdateGoalRequest::default()).unwrap(), None);

        let bad = UpdateGoalRequest {
            current_weight: None,
            status: Some("PAUSED".into()),
        };
        assert!(validate_update(&bad).is_err());
    }
}
