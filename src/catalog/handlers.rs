use axum::{extract::Query, routing::get, Json, Router};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{search, MealCatalogEntry};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/meals/search", get(search_meals))
}

/// GET /meals/search?q=chick
#[instrument]
pub async fn search_meals(Query(query): Query<SearchQuery>) -> Json<Vec<MealCatalogEntry>> {
    let found: Vec<MealCatalogEntry> = search(&query.q).into_iter().copied().collect();
    debug!(matches = found.len(), "catalog search");
    Json(found)
}
