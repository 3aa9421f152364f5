use super::record::NutritionRecord;

/// A record is unusable when the model could not name the food or returned no
/// energy or no macros at all.
pub fn is_unusable(rec: &NutritionRecord) -> bool {
    rec.food_name.to_lowercase().contains("unknown")
        || rec.calories == 0
        || (rec.protein == 0.0 && rec.carbs == 0.0 && rec.fats == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, calories: f64, protein: f64, carbs: f64, fats: f64) -> NutritionRecord {
        NutritionRecord::new(name, "1 serving", calories, protein, carbs, fats)
    }

    #[test]
    fn unknown_zero_record_is_unusable() {
        assert!(is_unusable(&rec("Unknown Food", 0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn real_record_is_usable() {
        assert!(!is_unusable(&rec("Apple", 95.0, 0.5, 25.0, 0.3)));
    }

    #[test]
    fn each_condition_alone_flags_record() {
        assert!(is_unusable(&rec("UNKNOWN dish", 200.0, 5.0, 5.0, 5.0)));
        assert!(is_unusable(&rec("Tea", 0.0, 1.0, 1.0, 1.0)));
        assert!(is_unusable(&rec("Soda", 150.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn single_zero_macro_is_fine() {
        assert!(!is_unusable(&rec("Olive oil", 119.0, 0.0, 0.0, 13.5)));
    }
}
