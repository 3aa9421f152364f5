//! Plausible nutrition estimates for when no model answer is usable.

use rand::Rng;
use serde::Serialize;

use super::record::{round_grams, NutritionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Small,
    Medium,
    Large,
}

impl Band {
    pub fn as_str(self) -> &'static str {
        match self {
            Band::Small => "small",
            Band::Medium => "medium",
            Band::Large => "large",
        }
    }

    pub fn ranges(self) -> &'static BandRanges {
        match self {
            Band::Small => &SMALL,
            Band::Medium => &MEDIUM,
            Band::Large => &LARGE,
        }
    }
}

/// Inclusive `(first, second)` bounds per field. Bounds are not required to be
/// ordered; sampling always draws between the lower and the higher value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRanges {
    pub calories: (f64, f64),
    pub protein: (f64, f64),
    pub carbs: (f64, f64),
    pub fats: (f64, f64),
}

const SMALL_KEYWORDS: [&str; 3] = ["small", "snack", "piece"];
const LARGE_KEYWORDS: [&str; 3] = ["large", "meal", "platter"];

pub const SMALL: BandRanges = BandRanges {
    calories: (100.0, 300.0),
    protein: (2.0, 10.0),
    carbs: (10.0, 30.0),
    fats: (2.0, 5.0),
};

pub const MEDIUM: BandRanges = BandRanges {
    calories: (200.0, 400.0),
    protein: (10.0, 12.0),
    carbs: (30.0, 60.0),
    fats: (1.0, 3.0),
};

/// Carbs for the large band as historically configured: the bounds are
/// inverted. Kept verbatim so a product decision can correct it here alone.
pub const LARGE_CARBS_G: (f64, f64) = (60.0, 10.0);

pub const LARGE: BandRanges = BandRanges {
    calories: (250.0, 500.0),
    protein: (4.0, 7.0),
    carbs: LARGE_CARBS_G,
    fats: (1.0, 5.0),
};

/// Coarse portion size from keywords in the food name. Small wins over large.
pub fn infer_band(food_name: &str) -> Band {
    let lower = food_name.to_lowercase();
    if SMALL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Band::Small
    } else if LARGE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Band::Large
    } else {
        Band::Medium
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (a, b): (f64, f64)) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    round_grams(rng.gen_range(lo..=hi))
}

/// Random nutrition for `food_name`, drawn from its inferred band.
pub fn generate<R: Rng + ?Sized>(food_name: &str, rng: &mut R) -> NutritionRecord {
    let band = infer_band(food_name);
    let r = band.ranges();
    NutritionRecord::new(
        food_name,
        format!("{} serving", band.as_str()),
        sample(rng, r.calories),
        sample(rng, r.protein),
        sample(rng, r.carbs),
        sample(rng, r.fats),
    )
}
