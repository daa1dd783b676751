use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::error;

use crate::observability;

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid input format", Some(message.into()))
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let message = Some(e.to_string());
        match e {
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", message),
            ServiceError::MemberNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "Member does not exist on this merchant", message)
            }
            ServiceError::OutOfRange(_) => Self::new(StatusCode::NOT_FOUND, "Page out of bounds", message),
            ServiceError::Conflict(_) => Self::new(StatusCode::CONFLICT, "Conflict", message),
            ServiceError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, "Invalid input format", message),
            ServiceError::Storage(_) | ServiceError::Model(_) => {
                error!(error = %e, "request failed in storage layer");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", message)
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        observability::REQUEST_ERRORS_TOTAL
            .with_label_values(&[self.status.as_str()])
            .inc();
        let body = match self.message {
            Some(msg) => serde_json::json!({"error": self.error, "message": msg}),
            None => serde_json::json!({"error": self.error}),
        };
        (self.status, Json(body)).into_response()
    }
}
