use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{dto::CreateExerciseRequest, repo_types::ExerciseLog};
use crate::{
    auth::services::AuthUser,
    dates::{self, DayWindow},
    error::AppError,
    state::AppState,
};

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/exercise-log", post(create_exercise))
        .route("/exercise-log/recent", get(recent_exercise))
}

#[instrument(skip(state, payload))]
pub async fn create_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<ExerciseLog>), AppError> {
    payload.validate().map_err(|e| {
        warn!(error = %e, %user_id, "invalid exercise log");
        e
    })?;
    let log = ExerciseLog::create(&state.db, user_id, &payload, dates::now_local()).await?;
    info!(%user_id, log_id = %log.id, "exercise logged");
    Ok((StatusCode::CREATED, Json(log)))
}

/// Latest entry since the start of today, or `null`.
#[instrument(skip(state))]
pub async fn recent_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Option<ExerciseLog>>, AppError> {
    let today = DayWindow::containing(dates::now_local());
    let log = ExerciseLog::latest_since(&state.db, user_id, today.start).await?;
    Ok(Json(log))
}
