use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::{
    dto::{DeleteResponse, DiaryEntry, IngestResponse},
    gateway::EntryGateway,
    validate::parse_draft,
};
use crate::{error::DiaryError, state::AppState};

pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest))
        .route("/retrieve", get(retrieve))
        .route("/delete", delete(delete_entry))
}

/// POST /ingest
#[instrument(skip(state, body))]
pub async fn ingest(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IngestResponse>, DiaryError> {
    let draft = body
        .map_err(DiaryError::from)
        .and_then(|Json(body)| parse_draft(&body, state.config.utc_offset))
        .map_err(|e| {
            warn!(error = ?e, "ingest rejected");
            e
        })?;

    let gateway = EntryGateway::from_ref(&state);
    let created = gateway.create(draft).await.map_err(|e| {
        error!(error = %e, "ingest failed");
        e
    })?;

    info!(id = %created.id, "entry ingested");
    Ok(Json(IngestResponse {
        success: true,
        status: created.status,
    }))
}

/// GET /retrieve
#[instrument(skip(gateway))]
pub async fn retrieve(
    State(gateway): State<EntryGateway>,
) -> Result<Json<Vec<DiaryEntry>>, DiaryError> {
    let entries = gateway.list_all().await.map_err(|e| {
        error!(error = %e, "retrieve failed");
        e
    })?;
    Ok(Json(entries))
}

/// DELETE /delete { id }
///
/// A missing, unreadable or non-JSON body is treated as a missing `id`.
#[instrument(skip(gateway, body))]
pub async fn delete_entry(
    State(gateway): State<EntryGateway>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DeleteResponse>, DiaryError> {
    let body = body.map(|Json(v)| v).unwrap_or_else(|rejection| {
        debug!(%rejection, "delete body unreadable");
        Value::Null
    });
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DiaryError::invalid("id", "Food item id (customer key) is required"))?;

    match gateway.delete_by_id(id).await {
        Ok(()) => Ok(Json(DeleteResponse { success: true })),
        Err(e @ DiaryError::NotFound(_)) => {
            warn!(%id, "delete target not found");
            Err(e)
        }
        Err(e) => {
            error!(error = %e, %id, "delete failed");
            Err(e)
        }
    }
}
