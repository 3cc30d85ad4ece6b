use axum::{
    extract::{FromRef, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use super::{
    aggregate::{group_by_meal, sum_totals, DailySummary, MealGroups},
    day::SelectedDay,
};
use crate::{entries::gateway::EntryGateway, error::DiaryError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: String,
    pub label: String,
    pub previous: String,
    pub next: String,
    pub meals: MealGroups,
    #[serde(flatten)]
    pub summary: DailySummary,
}

pub fn diary_routes() -> Router<AppState> {
    Router::new().route("/diary", get(day_view))
}

/// GET /diary?date=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn day_view(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayView>, DiaryError> {
    let offset = state.config.utc_offset;
    let today = SelectedDay::today(offset);
    let day = match query.date.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(raw) => SelectedDay::parse(raw)
            .ok_or_else(|| DiaryError::invalid("date", "Expected a YYYY-MM-DD date"))?,
        None => today,
    };

    let entries = EntryGateway::from_ref(&state)
        .list_all()
        .await
        .map_err(|e| {
            error!(error = %e, %day, "day view failed");
            e
        })?;

    let meals = group_by_meal(&entries, day.date(), offset);
    let summary = DailySummary::new(sum_totals(meals.iter()), state.config.goals);

    Ok(Json(DayView {
        date: day.to_string(),
        label: day.label(today.date()),
        previous: day.previous_day().to_string(),
        next: day.next_day().to_string(),
        meals,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{app::build_app, entries::dto::entry, state::AppState, storage::memory::MemoryStore};

    async fn get_json(store: Arc<MemoryStore>, uri: &str) -> (StatusCode, Value) {
        let app = build_app(AppState::fake(store));
        let res = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn day_view_groups_and_totals_the_selected_day() {
        let store = Arc::new(MemoryStore::seed(&[
            entry("1", "breakfast", "2024-03-10T00:00:00", 300.0),
            entry("2", "lunch", "2024-03-10T00:00:00", 500.0),
            entry("3", "dinner", "2024-03-11T00:00:00Z", 900.0),
            entry("4", "supper", "2024-03-10T00:00:00Z", 100.0),
        ]));
        let (status, body) = get_json(store, "/api/diary?date=2024-03-10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2024-03-10");
        assert_eq!(body["label"], "Sunday, March 10, 2024");
        assert_eq!(body["previous"], "2024-03-09");
        assert_eq!(body["next"], "2024-03-11");
        assert_eq!(body["meals"]["breakfast"][0]["id"], "1");
        assert_eq!(body["meals"]["lunch"][0]["id"], "2");
        assert_eq!(body["meals"]["dinner"], Value::Array(vec![]));
        assert_eq!(body["totals"]["calories"], 800.0);
        assert_eq!(body["goals"]["calories"], 2500.0);
        assert_eq!(body["remaining"]["calories"], 1700.0);
    }

    #[tokio::test]
    async fn over_goal_remaining_is_negative() {
        let store = Arc::new(MemoryStore::seed(&[
            entry("1", "dinner", "2024-03-10T00:00:00Z", 2000.0),
            entry("2", "dinner", "2024-03-10T00:00:00Z", 1000.0),
        ]));
        let (_, body) = get_json(store, "/api/diary?date=2024-03-10").await;
        assert_eq!(body["remaining"]["calories"], -500.0);
    }

    #[tokio::test]
    async fn missing_date_means_today() {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = get_json(store, "/api/diary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "Today");
        assert_eq!(body["totals"]["calories"], 0.0);
    }

    #[tokio::test]
    async fn bad_date_is_400_without_touching_the_store() {
        let store = Arc::new(MemoryStore::default());
        let (status, body) = get_json(store.clone(), "/api/diary?date=tomorrow").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "date");
        assert_eq!(store.lists.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_failure_is_500() {
        let store = Arc::new(MemoryStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let (status, _) = get_json(store, "/api/diary?date=2024-03-10").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
