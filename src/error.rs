use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::warning;

/// Failures of the OAuth refresh-token grant.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to reach token endpoint: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("refresh token was rejected by the authorization server: {0}")]
    Revoked(String),
    #[error("token endpoint answered {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("malformed token response: {0}")]
    Malformed(String),
}

impl RefreshError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RefreshError::Transport(_) => true,
            RefreshError::Rejected { status, .. } => *status >= 500,
            RefreshError::Revoked(_) | RefreshError::Malformed(_) => false,
        }
    }
}

/// Errors a request handler can end with.
///
/// Every variant maps to exactly one HTTP status and the body is always
/// `{"error": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Refresh(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            warning!("{}", message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
