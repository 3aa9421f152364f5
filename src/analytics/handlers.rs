use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{AnalyticsQuery, DietPoint, ExercisePoint},
    services::{diet_points, exercise_points},
};
use crate::{
    auth::services::AuthUser, dates, error::AppError, exercise::repo_types::ExerciseLog,
    nutrition::repo, profile::repo_types::HealthProfile, state::AppState,
};

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/diet", get(diet))
        .route("/analytics/exercise", get(exercise))
        .route("/analytics/health", get(health))
}

fn window_start(q: &AnalyticsQuery, user_id: Uuid) -> Result<OffsetDateTime, AppError> {
    let days = q.days().map_err(|e| {
        warn!(error = %e, %user_id, "invalid analytics window");
        e
    })?;
    debug!(%user_id, days, "analytics window");
    Ok(dates::now_local() - Duration::days(days))
}

#[instrument(skip(state))]
pub async fn diet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<AnalyticsQuery>,
) -> Result<Json<Vec<DietPoint>>, AppError> {
    let since = window_start(&q, user_id)?;
    let logs = repo::list_logs_since(&state.db, user_id, since).await?;
    let ids: Vec<_> = logs.iter().map(|l| l.id).collect();
    let entries = repo::list_entries_for_logs(&state.db, &ids).await?;
    Ok(Json(diet_points(logs, &entries)))
}

#[instrument(skip(state))]
pub async fn exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<AnalyticsQuery>,
) -> Result<Json<Vec<ExercisePoint>>, AppError> {
    let since = window_start(&q, user_id)?;
    let logs = ExerciseLog::list_since(&state.db, user_id, since).await?;
    Ok(Json(exercise_points(&logs, dates::now_local().offset())))
}

#[instrument(skip(state))]
pub async fn health(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<AnalyticsQuery>,
) -> Result<Json<Vec<HealthProfile>>, AppError> {
    let since = window_start(&q, user_id)?;
    let profiles = HealthProfile::list_created_since(&state.db, user_id, since).await?;
    Ok(Json(profiles))
}
