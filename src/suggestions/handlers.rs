use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use time::Duration;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{SuggestionRequest, SuggestionResponse, WorkoutResponse},
    prompts,
    services::{average_burned, average_intake, complete_pair, Habits, WeightDirection},
};
use crate::{
    ai::with_timeout,
    auth::services::AuthUser,
    dates,
    error::AppError,
    exercise::repo_types::ExerciseLog,
    nutrition::{repo, repo_types::attach_items},
    profile::{repo_types::HealthProfile, services::bmr},
    state::AppState,
};

pub fn suggestion_routes() -> Router<AppState> {
    Router::new()
        .route("/ai-suggestions", post(ai_suggestions))
        .route("/workout-recommendations", get(workout_recommendations))
}

async fn require_profile(state: &AppState, user_id: Uuid) -> Result<HealthProfile, AppError> {
    HealthProfile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, "health profile missing");
            AppError::not_found("Health profile not found")
        })
}

#[instrument(skip(state, payload))]
pub async fn ai_suggestions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SuggestionRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let goal: WeightDirection = payload
        .weight_goal
        .as_deref()
        .ok_or_else(|| AppError::bad_request("Weight goal is required"))?
        .parse()?;
    let profile = require_profile(&state, user_id).await?;

    let since = dates::now_local() - Duration::days(7);
    let logs = repo::list_logs_since(&state.db, user_id, since).await?;
    let exercise = ExerciseLog::list_since(&state.db, user_id, since).await?;
    let habits = Habits {
        bmr: bmr(
            profile.weight,
            profile.height,
            profile.age,
            profile.gender.as_deref(),
        ),
        avg_intake: average_intake(&logs),
        avg_burned: average_burned(&exercise),
    };
    let ids: Vec<_> = logs.iter().map(|l| l.id).collect();
    let entries = repo::list_entries_for_logs(&state.db, &ids).await?;
    let diet = attach_items(logs, entries);

    let prompt = prompts::weight_plan(goal, &profile, &habits, &diet, &exercise);
    let suggestions = with_timeout(
        state.config.gemini.timeout(),
        state.completion.complete_text(&prompt),
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "suggestion completion failed");
        AppError::Recommendations
    })?;

    info!(%user_id, goal = goal.as_str(), "suggestions generated");
    Ok(Json(SuggestionResponse { suggestions }))
}

#[instrument(skip(state))]
pub async fn workout_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<WorkoutResponse>, AppError> {
    let profile = require_profile(&state, user_id).await?;
    let since = dates::now_local() - Duration::days(30);
    let mut exercise = ExerciseLog::list_since(&state.db, user_id, since).await?;
    exercise.reverse();

    let strength = prompts::strength_training(&profile, &exercise);
    let cardio = prompts::cardio_and_flexibility(&profile);
    let (recommendation1, recommendation2) = complete_pair(
        &*state.completion,
        state.config.gemini.timeout(),
        &strength,
        &cardio,
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "workout completion failed");
        AppError::Recommendations
    })?;

    info!(%user_id, "workout recommendations generated");
    Ok(Json(WorkoutResponse {
        recommendation1,
        recommendation2,
    }))
}
