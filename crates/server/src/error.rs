use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] golf_core::Error),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::Core(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Core(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
