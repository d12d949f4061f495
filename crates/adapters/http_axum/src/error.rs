//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lumenhub_domain::error::{LumenHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// Error raised by the application or domain layer.
    Domain(LumenHubError),
    /// The request body could not be decoded.
    MalformedBody(String),
}

impl From<LumenHubError> for ApiError {
    fn from(err: LumenHubError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(LumenHubError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(LumenHubError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(LumenHubError::Apply(err)) => {
                tracing::error!(error = %err, "downstream apply failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            Self::MalformedBody(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
