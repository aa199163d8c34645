//! Error handling for the HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::line_client::LineApiError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("LINE API error: {0}")]
    LineApi(#[from] LineApiError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest { .. }
            | AppError::LineApi(LineApiError::InvalidPathSegment { .. }) => StatusCode::BAD_REQUEST,
            AppError::LineApi(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "FORBIDDEN",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::LineApi(LineApiError::InvalidPathSegment { .. }) => "BAD_REQUEST",
            AppError::LineApi(_) => "LINE_API_ERROR",
        }
    }

    /// Message returned to the caller. Detail stays in the server log.
    fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::BAD_REQUEST => "Bad Request",
            _ => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = ErrorResponse {
            error: self.error_code().to_string(),
            message: self.public_message().to_string(),
            code: status.as_u16().to_string(),
        };

        if status.is_server_error() {
            tracing::error!("API Error: {} - {}", self.error_code(), self);
        } else {
            tracing::warn!("API Error: {} - {}", self.error_code(), self);
        }

        (status, Json(error_response)).into_response()
    }
}
