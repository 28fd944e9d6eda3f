/// Unified error handling module
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error body returned by every route
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Failed to fetch {resource} data")]
    Upstream {
        resource: &'static str,
        details: String,
    },
    #[error("External API error: {0}")]
    ExternalApi(reqwest::Error),
    #[error("Malformed upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap any lower-level failure as an upstream failure for `resource`
    pub fn fetch_failed(resource: &'static str) -> impl FnOnce(ApiError) -> ApiError {
        move |err| match err {
            ApiError::InvalidInput(_) | ApiError::Upstream { .. } => err,
            other => ApiError::Upstream {
                resource,
                details: other.to_string(),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Request URLs carry the server's `api_key`; never keep them in the error
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::ExternalApi(err.without_url())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::InvalidInput(msg) => ErrorResponse {
                error: msg.clone(),
                details: None,
            },
            ApiError::Upstream { details, .. } => ErrorResponse {
                error: self.to_string(),
                details: Some(details.clone()),
            },
            ApiError::ExternalApi(_) | ApiError::Decode(_) => ErrorResponse {
                error: "Failed to fetch data from NASA API".to_string(),
                details: Some(self.to_string()),
            },
            ApiError::Internal(msg) => ErrorResponse {
                error: "Internal server error".to_string(),
                details: Some(msg.clone()),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
