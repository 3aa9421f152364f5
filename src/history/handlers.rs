use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{DayDetail, HistoryQuery, HistoryResponse},
    services::group_by_day,
};
use crate::{
    auth::services::AuthUser,
    dates::{self, DayWindow},
    error::AppError,
    exercise::repo_types::ExerciseLog,
    nutrition::{repo, repo_types::attach_items},
    state::AppState,
};

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/history", get(get_history))
}

/// GET /history?date=YYYY-MM-DD for one day, without `date` for an overview.
#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    match q.date.as_deref() {
        Some(raw) => {
            let date = dates::parse_iso_date(raw).ok_or_else(|| {
                warn!(%user_id, date = raw, "malformed history date");
                AppError::bad_request("Invalid date, expected YYYY-MM-DD")
            })?;
            let window = DayWindow::for_date(date);
            let logs = repo::list_logs_between(&state.db, user_id, window.start, window.end).await?;
            let ids: Vec<_> = logs.iter().map(|l| l.id).collect();
            let entries = repo::list_entries_for_logs(&state.db, &ids).await?;
            let exercise_logs =
                ExerciseLog::list_between(&state.db, user_id, window.start, window.end).await?;
            Ok(Json(HistoryResponse::Day(DayDetail {
                date,
                dietary_logs: attach_items(logs, entries),
                exercise_logs,
            })))
        }
        None => {
            let logs = repo::list_all_logs(&state.db, user_id).await?;
            let exercises = ExerciseLog::list_all(&state.db, user_id).await?;
            let offset = dates::now_local().offset();
            Ok(Json(HistoryResponse::Overview(group_by_day(
                logs, exercises, offset,
            ))))
        }
    }
}
