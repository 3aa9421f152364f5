//! Food recognition: turns a text description or photo into a nutrition
//! record and merges it into the caller's daily meal log.

pub mod dto;
pub mod generator;
pub mod handlers;
pub mod ledger;
pub mod parser;
pub mod record;
pub mod repo;
pub mod repo_types;
pub mod resolver;
pub mod validity;

use crate::state::AppState;
use axum::Router;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().merge(handlers::recognition_routes(max_upload_bytes))
}
