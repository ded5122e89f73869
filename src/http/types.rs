use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::TodoError;

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        let status = match &err {
            TodoError::EmptyBody | TodoError::NoValidFields => StatusCode::BAD_REQUEST,
            TodoError::NotFound => StatusCode::NOT_FOUND,
            TodoError::Refetch | TodoError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if !err.is_client_error() {
            tracing::error!(cause = %err_chain(&err), "request failed");
        }
        Self { status, error: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(self)).into_response() }
}

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct Success { pub success: bool }

impl Default for Success {
    fn default() -> Self { Self { success: true } }
}

fn err_chain(err: &TodoError) -> String {
    let mut out = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    out
}
