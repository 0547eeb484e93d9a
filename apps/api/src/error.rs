use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dynsync_core::{ConfigError, SyncError};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around sync and settings errors.
#[derive(Debug)]
pub enum ApiError {
    Sync(SyncError),
    Settings(ConfigError),
    Unauthorized(&'static str),
}

impl From<SyncError> for ApiError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        Self::Settings(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Sync(SyncError::Form(error)) => (StatusCode::BAD_REQUEST, error.to_string()),
            Self::Sync(SyncError::Config(error)) => {
                (StatusCode::SERVICE_UNAVAILABLE, error.user_message())
            }
            Self::Sync(SyncError::Repo(error)) => {
                warn!(error = %error, "dynamics request failed");
                (StatusCode::BAD_GATEWAY, error.user_message())
            }
            Self::Settings(error) => (StatusCode::BAD_REQUEST, error.user_message()),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, (*message).to_owned()),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure while configuring or starting the API process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}
