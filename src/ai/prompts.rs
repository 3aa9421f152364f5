//! Prompts for nutrition lookups.

/// Asks for the structured nutrition shape for a named food.
pub fn nutrition_for_food(food_name: &str) -> String {
    format!(
        r#"Provide nutritional information for "{food_name}" in this exact JSON format:
{{
  "foodName": "{food_name}",
  "servingSize": "standard serving size",
  "nutritionalInfo": {{
    "calories": number,
    "protein": number (in grams),
    "carbs": number (in grams),
    "fats": number (in grams)
  }}
}}
Only respond with the JSON."#
    )
}

/// Asks the vision model to identify a photographed food.
pub fn nutrition_for_image() -> &'static str {
    r#"Analyze this food image and provide nutritional information in this exact JSON format:
{
  "foodName": "name of the food",
  "servingSize": "estimated serving size",
  "nutritionalInfo": {
    "calories": number,
    "protein": number (in grams),
    "carbs": number (in grams),
    "fats": number (in grams)
  }
}
If you cannot identify the food, set "foodName" to "unknown" and every number to 0.
Only respond with the JSON."#
}
