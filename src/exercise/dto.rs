use serde::Deserialize;

use crate::error::AppError;

pub const MAX_DURATION_MIN: i32 = 24 * 60;
pub const MAX_CALORIES_BURNED: i32 = 20_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    #[serde(rename = "type")]
    pub exercise_type: String,
    pub duration: i32,
    pub intensity: String,
    #[serde(default)]
    pub calories_burned: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateExerciseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.exercise_type.trim().is_empty() || self.intensity.trim().is_empty() {
            return Err(AppError::bad_request("Missing required fields"));
        }
        if self.duration <= 0 {
            return Err(AppError::bad_request("Duration must be positive"));
        }
        if self.duration > MAX_DURATION_MIN {
            return Err(AppError::bad_request("Duration cannot exceed one day"));
        }
        match self.calories_burned {
            Some(c) if c < 0 => {
                return Err(AppError::bad_request("Calories burned cannot be negative"))
            }
            Some(c) if c > MAX_CALORIES_BURNED => {
                return Err(AppError::bad_request(format!(
                    "Calories burned cannot exceed {MAX_CALORIES_BURNED}"
                )))
            }
            _ => {}
        }
        Ok(())
    }
}
