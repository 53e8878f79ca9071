use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::calendar::calendar_error::CalendarError;
use crate::types::blackout_window::WindowError;

/// Request-level failures. Nothing is retried; the client decides what to do.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401 - token missing, wrong, or no secret configured
    #[error("Unauthorized")]
    Unauthorized,

    /// 422 - query parameters out of range or not integers
    #[error("{0}")]
    Validation(String),

    /// 500 - upstream credential not configured
    #[error("{0}")]
    Config(String),

    /// 502 - calendar upstream unreachable, non-200, or unparseable
    #[error("{0}")]
    Upstream(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Validation(_) => "validation_error",
            ApiError::Config(_) => "config_error",
            ApiError::Upstream(_) => "upstream_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.kind(),
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::MissingCredential(name) => {
                ApiError::Config(format!("Missing {name} in environment"))
            }
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<WindowError> for ApiError {
    fn from(err: WindowError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
