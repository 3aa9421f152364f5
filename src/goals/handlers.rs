use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateGoalRequest, GoalView, UpdateGoalRequest},
    repo_types::WeightGoal,
    services::{progress, validate_create, validate_update},
};
use crate::{auth::services::AuthUser, error::AppError, state::AppState};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/weight-goals", get(list_goals).post(create_goal))
        .route("/weight-goals/:id", patch(update_goal))
}

fn view(goal: WeightGoal) -> GoalView {
    GoalView {
        progress: progress(goal.start_weight, goal.target_weight, goal.current_weight),
        goal,
    }
}

#[instrument(skip(state, payload))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalView>), AppError> {
    let goal_type = validate_create(&payload).map_err(|e| {
        warn!(error = %e, %user_id, "invalid weight goal");
        e
    })?;
    let goal = WeightGoal::create(&state.db, user_id, &payload, goal_type).await?;
    info!(%user_id, goal_id = %goal.id, "weight goal created");
    Ok((StatusCode::CREATED, Json(view(goal))))
}

#[instrument(skip(state))]
pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GoalView>>, AppError> {
    let goals = WeightGoal::list_by_user(&state.db, user_id).await?;
    Ok(Json(goals.into_iter().map(view).collect()))
}

#[instrument(skip(state, payload))]
pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<GoalView>, AppError> {
    let status = validate_update(&payload)?;
    let goal = WeightGoal::update(&state.db, user_id, id, payload.current_weight, status)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, goal_id = %id, "weight goal not found");
            AppError::not_found("Weight goal not found")
        })?;
    info!(%user_id, goal_id = %id, status = %goal.status, "weight goal updated");
    Ok(Json(view(goal)))
}
