use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{BmiResponse, UpsertProfileRequest},
    repo_types::HealthProfile,
    services::{bmi, round1, round2, validate},
};
use crate::{auth::services::AuthUser, error::AppError, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user/health-profile",
            get(get_profile).put(put_profile),
        )
        .route("/user/bmi", get(get_bmi))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<HealthProfile>, AppError> {
    HealthProfile::find_by_user(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Health profile not found"))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<HealthProfile>, AppError> {
    validate(&payload).map_err(|e| {
        warn!(error = %e, %user_id, "invalid health profile");
        e
    })?;
    let value = round2(bmi(payload.height, payload.weight));
    let profile = HealthProfile::upsert(&state.db, user_id, &payload, value).await?;
    info!(%user_id, bmi = value, "health profile saved");
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn get_bmi(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<BmiResponse>, AppError> {
    let profile = HealthProfile::find_or_create_default(&state.db, user_id).await?;
    let value = round1(bmi(profile.height, profile.weight));
    if profile.bmi != Some(value) {
        debug!(%user_id, bmi = value, "storing recomputed bmi");
        HealthProfile::update_bmi(&state.db, profile.id, value).await?;
    }
    Ok(Json(BmiResponse { bmi: value }))
}
