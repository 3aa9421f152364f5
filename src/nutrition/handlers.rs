use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{FoodForm, RecognitionResponse},
    ledger::LedgerEntry,
    resolver::{FoodInput, Resolver},
};
use crate::{auth::services::AuthUser, dates, error::AppError, state::AppState, storage};

pub fn recognition_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/food-recognition", post(recognize_food))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

async fn read_form(mp: &mut Multipart) -> Result<FoodForm, AppError> {
    let mut form = FoodForm::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("foodInput") => {
                form.file_name = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                form.food_input = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?,
                );
            }
            Some("inputType") => {
                form.input_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?,
                )
            }
            Some("mealType") => {
                form.meal_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?,
                )
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Stores the uploaded photo; a failure leaves the entry without an image.
async fn store_image(state: &AppState, user_id: Uuid, input: &FoodInput) -> Option<String> {
    let FoodInput::Image {
        data, mime_type, ..
    } = input
    else {
        return None;
    };
    let key = storage::food_image_key(user_id, Uuid::new_v4(), mime_type);
    match state
        .storage
        .put_object(&key, data.clone(), mime_type)
        .await
    {
        Ok(()) => Some(key),
        Err(e) => {
            warn!(error = %e, %user_id, "food image upload failed; saving entry without image");
            None
        }
    }
}

/// POST /food-recognition (multipart: foodInput, inputType, mealType)
#[instrument(skip(state, mp))]
pub async fn recognize_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<Json<RecognitionResponse>, AppError> {
    let (input, meal_type) = read_form(&mut mp).await?.into_input().map_err(|e| {
        warn!(error = %e, %user_id, "rejected food recognition request");
        e
    })?;

    let resolver = Resolver::new(&*state.completion, state.config.gemini.timeout());
    let mut rng = StdRng::from_entropy();
    let resolution = resolver.resolve(&input, &mut rng).await.map_err(|e| {
        error!(error = %e, %user_id, "food resolution failed");
        AppError::FoodProcessing
    })?;

    let image_url = store_image(&state, user_id, &input).await;

    let dietary_log = state
        .ledger
        .record(LedgerEntry {
            user_id,
            meal_type,
            record: resolution.record.clone(),
            source: resolution.source,
            image_url,
            at: dates::now_local(),
        })
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "recording food entry failed");
            AppError::FoodProcessing
        })?;

    info!(
        %user_id,
        log_id = %dietary_log.log.id,
        source = %resolution.source,
        calories = resolution.record.calories,
        "food recognized"
    );

    Ok(Json(RecognitionResponse {
        success: true,
        dietary_log,
        nutrition_info: resolution.record,
        source: resolution.source,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::services::JwtKeys;
    use crate::nutrition::ledger::memory::InMemoryLedger;
    use crate::nutrition::resolver::tests::ScriptedClient;
    use crate::state::fake::FakeStorage;

    const BOUNDARY: &str = "nutritrackboundary";

    fn multipart(parts: &[(&str, Option<(&str, &str)>, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file, value) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file {
                Some((file_name, ct)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {ct}\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn request(state: &AppState, body: Vec<u8>) -> Request<Body> {
        let token = JwtKeys::from_ref(state)
            .sign_access(Uuid::new_v4())
            .unwrap();
        Request::post("/food-recognition")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn app(state: AppState) -> Router {
        recognition_routes(state.config.max_upload_bytes).with_state(state)
    }

    async fn json(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn text_input_is_resolved_and_recorded() {
        let client = ScriptedClient::new([
            r#"{"foodName":"Banana","servingSize":"1 medium","nutritionalInfo":{"calories":105,"protein":1.3,"carbs":27,"fats":0.4}}"#,
        ]);
        let ledger = Arc::new(InMemoryLedger::default());
        let state = AppState::fake_with(
            Arc::new(client),
            ledger.clone(),
            Arc::new(FakeStorage::default()),
        );

        let body = multipart(&[
            ("foodInput", None, "banana"),
            ("inputType", None, "text"),
            ("mealType", None, "BREAKFAST"),
        ]);
        let res = app(state.clone())
            .oneshot(request(&state, body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let v = json(res).await;
        assert_eq!(v["success"], true);
        assert_eq!(v["source"], "predicted");
        assert_eq!(v["nutritionInfo"]["foodName"], "Banana");
        assert_eq!(v["dietaryLog"]["totalCalories"], 105);
        assert_eq!(v["dietaryLog"]["foodItems"][0]["aiPredicted"], true);

        let logs = ledger.all().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log.meal_type, "BREAKFAST");
    }

    #[tokio::test]
    async fn image_input_is_uploaded_and_keyed_on_entry() {
        let client = ScriptedClient::new([
            r#"{"foodName":"Pad Thai","servingSize":"1 plate","nutritionalInfo":{"calories":600,"protein":20,"carbs":80,"fats":22}}"#,
        ]);
        let storage = Arc::new(FakeStorage::default());
        let state = AppState::fake_with(
            Arc::new(client),
            Arc::new(InMemoryLedger::default()),
            storage.clone(),
        );

        let body = multipart(&[
            ("foodInput", Some(("pad_thai.png", "image/png")), "png-bytes"),
            ("inputType", None, "image"),
            ("mealType", None, "DINNER"),
        ]);
        let res = app(state.clone())
            .oneshot(request(&state, body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let v = json(res).await;
        let keys = storage.keys.lock().unwrap().clone();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].ends_with(".png"));
        assert_eq!(v["dietaryLog"]["foodItems"][0]["imageUrl"], keys[0].as_str());
    }

    #[tokio::test]
    async fn storage_failure_keeps_entry_without_image() {
        let client = ScriptedClient::new([
            r#"{"foodName":"Toast","servingSize":"1 slice","nutritionalInfo":{"calories":80,"protein":3,"carbs":14,"fats":1}}"#,
        ]);
        let storage = Arc::new(FakeStorage {
            fail: true,
            ..FakeStorage::default()
        });
        let state = AppState::fake_with(
            Arc::new(client),
            Arc::new(InMemoryLedger::default()),
            storage,
        );

        let body = multipart(&[
            ("foodInput", Some(("toast.jpg", "image/jpeg")), "jpeg-bytes"),
            ("inputType", None, "image"),
            ("mealType", None, "BREAKFAST"),
        ]);
        let res = app(state.clone())
            .oneshot(request(&state, body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let v = json(res).await;
        assert!(v["dietaryLog"]["foodItems"][0]["imageUrl"].is_null());
    }

    #[tokio::test]
    async fn missing_fields_are_bad_request() {
        let state = AppState::fake();
        let body = multipart(&[("foodInput", None, "apple"), ("inputType", None, "text")]);
        let res = app(state.clone())
            .oneshot(request(&state, body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res).await["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn completion_failure_is_food_processing_error() {
        let ledger = Arc::new(InMemoryLedger::default());
        let state = AppState::fake_with(
            Arc::new(ScriptedClient::failing()),
            ledger.clone(),
            Arc::new(FakeStorage::default()),
        );
        let body = multipart(&[
            ("foodInput", None, "apple"),
            ("inputType", None, "text"),
            ("mealType", None, "SNACK"),
        ]);
        let res = app(state.clone())
            .oneshot(request(&state, body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json(res).await["error"],
            "Failed to process food information"
        );
        assert!(ledger.all().await.is_empty());
    }

    #[tokio::test]
    async fn unauthenticated_request_is_rejected() {
        let state = AppState::fake();
        let res = app(state)
            .oneshot(
                Request::post("/food-recognition")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
