pub mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
