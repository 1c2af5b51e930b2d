//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use telebridge_domain::error::BridgeError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`BridgeError`] to an HTTP response with appropriate status code.
pub struct ApiError(BridgeError);

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BridgeError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            BridgeError::Decode(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            BridgeError::Transport(err) => {
                tracing::error!(error = %err, "bus transport error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "message bus unavailable".to_string(),
                )
            }
            BridgeError::Persistence(err) => {
                tracing::error!(error = %err, "persistence error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
