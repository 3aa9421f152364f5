use serde::{Deserialize, Serialize};

/// Resolved nutrition for one food item.
///
/// Macros are non-negative; calories are whole numbers and macro grams carry
/// one decimal place. Build through [`NutritionRecord::new`] to keep that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub food_name: String,
    pub serving_size: String,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl NutritionRecord {
    pub fn new(
        food_name: impl Into<String>,
        serving_size: impl Into<String>,
        calories: f64,
        protein: f64,
        carbs: f64,
        fats: f64,
    ) -> Self {
        Self {
            food_name: food_name.into(),
            serving_size: serving_size.into(),
            calories: round_calories(calories),
            protein: round_grams(protein),
            carbs: round_grams(carbs),
            fats: round_grams(fats),
        }
    }
}

/// Where a [`NutritionRecord`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    /// The model's answer for the submitted input.
    Predicted,
    /// The model's answer for a name derived from the uploaded file name.
    FilenameFallback,
    /// A random estimate; no usable model answer.
    Generated,
}

impl ResolutionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionSource::Predicted => "predicted",
            ResolutionSource::FilenameFallback => "filename-fallback",
            ResolutionSource::Generated => "generated",
        }
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResolutionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predicted" => Ok(ResolutionSource::Predicted),
            "filename-fallback" => Ok(ResolutionSource::FilenameFallback),
            "generated" => Ok(ResolutionSource::Generated),
            other => Err(format!("unknown resolution source: {other}")),
        }
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

pub fn round_calories(v: f64) -> i32 {
    sanitize(v).round().min(i32::MAX as f64) as i32
}

pub fn round_grams(v: f64) -> f64 {
    (sanitize(v) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rounds_and_clamps() {
        let r = NutritionRecord::new("Toast", "1 slice", 79.5, 2.66, -3.0, f64::NAN);
        assert_eq!(r.calories, 80);
        assert_eq!(r.protein, 2.7);
        assert_eq!(r.carbs, 0.0);
        assert_eq!(r.fats, 0.0);
    }

    #[test]
    fn source_serializes_kebab_case() {
        let json = serde_json::to_string(&ResolutionSource::FilenameFallback).unwrap();
        assert_eq!(json, "\"filename-fallback\"");
        assert_eq!(
            "generated".parse::<ResolutionSource>().unwrap(),
            ResolutionSource::Generated
        );
        assert!("guessed".parse::<ResolutionSource>().is_err());
    }

    #[test]
    fn record_serializes_camel_case() {
        let r = NutritionRecord::new("Apple", "1 medium", 95.0, 0.5, 25.0, 0.3);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["foodName"], "Apple");
        assert_eq!(v["servingSize"], "1 medium");
        assert_eq!(v["calories"], 95);
    }
}
