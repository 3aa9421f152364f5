use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::exercise_routes())
}
