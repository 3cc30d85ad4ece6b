use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// One rejected input field, reported back to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("Validation error")]
    Validation(Vec<FieldIssue>),

    #[error("{0}")]
    NotFound(String),

    #[error("document store request failed: {0}")]
    Gateway(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl DiaryError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldIssue::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DiaryError::Validation(_) => StatusCode::BAD_REQUEST,
            DiaryError::NotFound(_) => StatusCode::NOT_FOUND,
            DiaryError::Gateway(_) | DiaryError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for DiaryError {
    fn from(e: reqwest::Error) -> Self {
        DiaryError::Gateway(e.to_string())
    }
}

/// Unreadable request bodies are reported in the usual validation shape
/// instead of axum's plain-text rejection.
impl From<JsonRejection> for DiaryError {
    fn from(rejection: JsonRejection) -> Self {
        DiaryError::invalid("body", rejection.body_text())
    }
}

impl IntoResponse for DiaryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            DiaryError::Validation(issues) => json!({
                "error": self.to_string(),
                "details": issues,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
