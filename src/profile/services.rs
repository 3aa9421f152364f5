//! Body metrics derived from a health profile.

use super::dto::UpsertProfileRequest;
use crate::error::AppError;

pub const DEFAULT_HEIGHT_CM: f64 = 170.0;
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_AGE: i32 = 30;
pub const DEFAULT_ACTIVITY_LEVEL: &str = "MODERATE";
pub const DEFAULT_WEEKLY_EXERCISE: i32 = 3;

/// Body mass index, unrounded. Height in cm, weight in kg.
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let m = height_cm / 100.0;
    weight_kg / (m * m)
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day.
pub fn bmr(weight_kg: f64, height_cm: f64, age: i32, gender: Option<&str>) -> i32 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    let adj = match gender {
        Some(g) if g.trim().eq_ignore_ascii_case("female") => -161.0,
        _ => 5.0,
    };
    (base + adj).round() as i32
}

pub fn validate(req: &UpsertProfileRequest) -> Result<(), AppError> {
    if !(req.height > 0.0) || !(req.weight > 0.0) {
        return Err(AppError::bad_request("Height and weight must be positive"));
    }
    if req.age <= 0 {
        return Err(AppError::bad_request("Age must be positive"));
    }
    if req.weekly_exercise < 0 {
        return Err(AppError::bad_request("Weekly exercise cannot be negative"));
    }
    Ok(())
}
