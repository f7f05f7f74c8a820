use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use service::errors::RosterError;

/// HTTP-facing error: a status code plus a `detail` message body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        let status = match err {
            RosterError::AlreadyRegistered { .. } => StatusCode::BAD_REQUEST,
            RosterError::UnknownActivity(_) | RosterError::NotRegistered { .. } => {
                StatusCode::NOT_FOUND
            }
        };
        Self { status, detail: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}
