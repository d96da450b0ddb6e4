use std::error::Error;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

/// Every way a request can fail, rendered as `{"error": {"message", "status"}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    /// An extractor refused the request before it reached a handler
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn book_not_found(isbn: &str) -> Self {
        ApiError::NotFound(format!("There is no book with an isbn '{isbn}'"))
    }

    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Build a 500 for an error raised by the storage layer
pub fn internal_error<E>(err: E) -> ApiError
where
    E: Error,
{
    ApiError::Internal(err.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
        }

        let message = match self {
            ApiError::Validation(violations) => Value::from(violations),
            ApiError::NotFound(message)
            | ApiError::Rejected { message, .. }
            | ApiError::Internal(message) => Value::from(message),
        };

        let body = json!({
            "error": {
                "message": message,
                "status": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}
