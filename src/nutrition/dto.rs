use bytes::Bytes;
use serde::Serialize;

use super::record::{NutritionRecord, ResolutionSource};
use super::repo_types::DietaryLog;
use super::resolver::FoodInput;
use crate::error::AppError;

/// Raw multipart fields of a food recognition request.
#[derive(Debug, Default)]
pub struct FoodForm {
    pub food_input: Option<Bytes>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub input_type: Option<String>,
    pub meal_type: Option<String>,
}

impl FoodForm {
    /// Validated input and meal type.
    pub fn into_input(self) -> Result<(FoodInput, String), AppError> {
        let missing = || AppError::bad_request("Missing required fields");

        let data = self.food_input.filter(|b| !b.is_empty()).ok_or_else(missing)?;
        let input_type = self.input_type.ok_or_else(missing)?;
        let meal_type = self
            .meal_type
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .ok_or_else(missing)?;

        let input = match input_type.trim() {
            "text" => {
                let text = String::from_utf8(data.to_vec())
                    .map_err(|_| AppError::bad_request("foodInput must be UTF-8 text"))?;
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(missing());
                }
                FoodInput::Text(text)
            }
            "image" => FoodInput::Image {
                data,
                mime_type: self
                    .content_type
                    .filter(|c| c.starts_with("image/"))
                    .unwrap_or_else(|| "image/jpeg".into()),
                file_name: self.file_name.unwrap_or_default(),
            },
            other => {
                return Err(AppError::bad_request(format!(
                    "inputType must be \"text\" or \"image\", got \"{other}\""
                )))
            }
        };
        Ok((input, meal_type))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResponse {
    pub success: bool,
    pub dietary_log: DietaryLog,
    pub nutrition_info: NutritionRecord,
    pub source: ResolutionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(input: &'static [u8], kind: &str, meal: &str) -> FoodForm {
        FoodForm {
            food_input: Some(Bytes::from_static(input)),
            input_type: Some(kind.into()),
            meal_type: Some(meal.into()),
            ..FoodForm::default()
        }
    }

    #[test]
    fn text_form_becomes_text_input() {
        let (input, meal) = form(b"  banana ", "text", "BREAKFAST").into_input().unwrap();
        assert!(matches!(input, FoodInput::Text(ref t) if t == "banana"));
        assert_eq!(meal, "BREAKFAST");
    }

    #[test]
    fn image_form_keeps_file_metadata() {
        let mut f = form(b"\xff\xd8", "image", "LUNCH");
        f.file_name = Some("pad_thai.jpg".into());
        f.content_type = Some("image/png".into());
        match f.into_input().unwrap().0 {
            FoodInput::Image {
                mime_type,
                file_name,
                ..
            } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(file_name, "pad_thai.jpg");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut f = form(b"apple", "text", "LUNCH");
        f.meal_type = None;
        let err = f.into_input().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");

        assert!(FoodForm::default().into_input().is_err());
        assert!(form(b"", "text", "LUNCH").into_input().is_err());
    }

    #[test]
    fn unknown_input_type_is_rejected() {
        let err = form(b"apple", "video", "LUNCH").into_input().unwrap_err();
        assert!(err.to_string().contains("video"));
    }
}
