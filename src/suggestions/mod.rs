//! Coaching text from the completion service.

use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod prompts;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::suggestion_routes())
}
