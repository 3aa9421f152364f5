//! Turns free-form completion text into a [`NutritionRecord`].
//!
//! A structured JSON decode is tried first. Only when that fails is the text
//! scanned field by field with patterns. Neither path errors: a missing field
//! becomes zero, the fallback name, or `"standard serving"`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::record::NutritionRecord;

pub const DEFAULT_FOOD_NAME: &str = "Unknown Food";
pub const DEFAULT_SERVING: &str = "standard serving";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFields {
    pub food_name: Option<String>,
    pub serving_size: Option<String>,
    pub nutritional_info: MacroFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacroFields {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
}

/// Outcome of the structured decode.
#[derive(Debug, Clone)]
pub enum DecodedResponse {
    Structured(NutritionFields),
    Unstructured(String),
}

lazy_static! {
    static ref FENCED_RE: Regex = Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").unwrap();
    static ref CALORIES_RE: Regex = Regex::new(r#"(?i)calories"?\s*:?\s*"?(\d+)"#).unwrap();
    static ref PROTEIN_RE: Regex = Regex::new(r#"(?i)protein"?\s*:?\s*"?([\d.]+)"#).unwrap();
    static ref CARBS_RE: Regex = Regex::new(r#"(?i)carbs"?\s*:?\s*"?([\d.]+)"#).unwrap();
    static ref FATS_RE: Regex = Regex::new(r#"(?i)fats"?\s*:?\s*"?([\d.]+)"#).unwrap();
    static ref FOOD_ITEM_RE: Regex = Regex::new(r#"(?i)food item"?\s*:?\s*"?([^,\n"}]+)"#).unwrap();
    static ref SERVING_RE: Regex = Regex::new(r#"(?i)serving size"?\s*:?\s*"?([^,\n"}]+)"#).unwrap();
}

fn try_structured(candidate: &str) -> Option<NutritionFields> {
    serde_json::from_str::<NutritionFields>(candidate.trim()).ok()
}

/// Structured decode of `raw`, accepting a bare object, a code-fenced object,
/// or an object embedded in surrounding prose.
pub fn decode(raw: &str) -> DecodedResponse {
    if let Some(fields) = try_structured(raw) {
        return DecodedResponse::Structured(fields);
    }
    if let Some(fields) = FENCED_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| try_structured(m.as_str()))
    {
        return DecodedResponse::Structured(fields);
    }
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Some(fields) = try_structured(&raw[start..=end]) {
                return DecodedResponse::Structured(fields);
            }
        }
    }
    DecodedResponse::Unstructured(raw.to_string())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn from_structured(fields: NutritionFields, fallback_name: &str) -> NutritionRecord {
    let m = fields.nutritional_info;
    NutritionRecord::new(
        non_empty(fields.food_name).unwrap_or_else(|| fallback_name.to_string()),
        non_empty(fields.serving_size).unwrap_or_else(|| DEFAULT_SERVING.to_string()),
        m.calories.unwrap_or(0.0),
        m.protein.unwrap_or(0.0),
        m.carbs.unwrap_or(0.0),
        m.fats.unwrap_or(0.0),
    )
}

fn capture_number(re: &Regex, text: &str) -> f64 {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().trim_end_matches('.').parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn capture_label(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn from_patterns(text: &str, fallback_name: &str) -> NutritionRecord {
    NutritionRecord::new(
        capture_label(&FOOD_ITEM_RE, text).unwrap_or_else(|| fallback_name.to_string()),
        capture_label(&SERVING_RE, text).unwrap_or_else(|| DEFAULT_SERVING.to_string()),
        capture_number(&CALORIES_RE, text),
        capture_number(&PROTEIN_RE, text),
        capture_number(&CARBS_RE, text),
        capture_number(&FATS_RE, text),
    )
}

/// Parses completion text into a record, naming it `fallback_name` when the
/// text does not say what the food is.
pub fn parse_response(raw: &str, fallback_name: &str) -> NutritionRecord {
    match decode(raw) {
        DecodedResponse::Structured(fields) => from_structured(fields, fallback_name),
        DecodedResponse::Unstructured(text) => from_patterns(&text, fallback_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_json_is_taken_verbatim() {
        let raw = r#"{"foodName":"Banana","servingSize":"1 medium","nutritionalInfo":{"calories":105,"protein":1.3,"carbs":27,"fats":0.4}}"#;
        let rec = parse_response(raw, "fallback");
        assert_eq!(
            rec,
            NutritionRecord {
                food_name: "Banana".into(),
                serving_size: "1 medium".into(),
                calories: 105,
                protein: 1.3,
                carbs: 27.0,
                fats: 0.4,
            }
        );
    }

    #[test]
    fn free_text_uses_patterns() {
        let raw = "Calories: 250, Protein: 10, Carbs: 30, Fats: 5, Food Item: Grilled Chicken, Serving Size: 1 plate";
        let rec = parse_response(raw, "fallback");
        assert_eq!(rec.calories, 250);
        assert_eq!(rec.protein, 10.0);
        assert_eq!(rec.carbs, 30.0);
        assert_eq!(rec.fats, 5.0);
        assert_eq!(rec.food_name, "Grilled Chicken");
        assert_eq!(rec.serving_size, "1 plate");
    }

    #[test]
    fn structured_zeros_do_not_trigger_patterns() {
        let raw = r#"{"foodName":"unknown","nutritionalInfo":{"calories":0,"protein":0,"carbs":0,"fats":0}}"#;
        assert!(matches!(decode(raw), DecodedResponse::Structured(_)));
        let rec = parse_response(raw, "pizza slice");
        assert_eq!(rec.food_name, "unknown");
        assert_eq!(rec.calories, 0);
        assert_eq!(rec.serving_size, DEFAULT_SERVING);
    }

    #[test]
    fn structured_missing_fields_default() {
        let raw = r#"{"nutritionalInfo":{"calories":120.6,"protein":null}}"#;
        let rec = parse_response(raw, "Toast");
        assert_eq!(rec.food_name, "Toast");
        assert_eq!(rec.calories, 121);
        assert_eq!(rec.protein, 0.0);
        assert_eq!(rec.carbs, 0.0);
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let raw = "```json\n{\"foodName\":\"Rice\",\"servingSize\":\"1 cup\",\"nutritionalInfo\":{\"calories\":206,\"protein\":4.25,\"carbs\":45,\"fats\":0.44}}\n```";
        let rec = parse_response(raw, "x");
        assert_eq!(rec.food_name, "Rice");
        assert_eq!(rec.calories, 206);
        assert_eq!(rec.protein, 4.3);
        assert_eq!(rec.fats, 0.4);
    }

    #[test]
    fn json_inside_prose_is_found() {
        let raw = "Sure! Here it is: {\"foodName\":\"Egg\",\"nutritionalInfo\":{\"calories\":78,\"protein\":6.3,\"carbs\":0.6,\"fats\":5.3}} Enjoy.";
        assert_eq!(parse_response(raw, "x").food_name, "Egg");
    }

    #[test]
    fn json_without_nutrition_object_falls_back_to_patterns() {
        let raw = r#"{"foodName":"Soup","calories":90}"#;
        assert!(matches!(decode(raw), DecodedResponse::Unstructured(_)));
        let rec = parse_response(raw, "Soup bowl");
        assert_eq!(rec.calories, 90);
        assert_eq!(rec.food_name, "Soup bowl");
    }

    #[test]
    fn garbage_never_panics() {
        for raw in ["", "I cannot identify this food.", "{{{", "protein: ...", "calories:"] {
            let rec = parse_response(raw, DEFAULT_FOOD_NAME);
            assert_eq!(rec.food_name, DEFAULT_FOOD_NAME);
            assert_eq!(rec.calories, 0);
            assert_eq!(rec.serving_size, DEFAULT_SERVING);
        }
    }

    #[test]
    fn decimal_macros_are_rounded() {
        let rec = parse_response("calories 99 protein 3.14159 carbs 12.05 fats 0.96", "x");
        assert_eq!(rec.calories, 99);
        assert_eq!(rec.protein, 3.1);
        assert_eq!(rec.fats, 1.0);
    }
}
