pub mod dto;
pub mod gateway;
pub mod handlers;
pub mod validate;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::entry_routes()
}
