pub mod aggregate;
pub mod day;
pub mod form;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::diary_routes()
}
