// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;

/// Fallback message when the model rejects a document without a reason.
pub const NOT_A_RESUME_FALLBACK: &str =
    "The uploaded file does not appear to be a resume/CV.";

/// Generic client-facing message for any extraction failure.
/// The specific upstream detail is logged server-side, never forwarded.
pub const EXTRACTION_FAILED: &str = "Failed to parse PDF file";

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    ServiceUnavailable(String),
    DatabaseError(sqlx::Error),
    ValidationError(String),
    /// Multipart request carried no `file` field.
    NoFileProvided,
    /// The model declared the document is not a resume; carries its reason.
    NotAResume(Option<String>),
    /// The completion endpoint returned a non-success status or transport error.
    UpstreamFailure(String),
    /// The completion response carried no text content.
    EmptyModelResponse,
    /// The model's text could not be parsed as JSON after fence stripping.
    MalformedModelJson(String),
    /// The extraction credential is missing; fatal before any outbound call.
    ServerMisconfigured,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::NoFileProvided => write!(f, "No file provided"),
            ApiError::NotAResume(reason) => write!(
                f,
                "Not a resume: {}",
                reason.as_deref().unwrap_or(NOT_A_RESUME_FALLBACK)
            ),
            ApiError::UpstreamFailure(detail) => write!(f, "Upstream failure: {}", detail),
            ApiError::EmptyModelResponse => write!(f, "Empty response from LLM"),
            ApiError::MalformedModelJson(raw) => {
                write!(f, "Invalid JSON response from LLM: {}", raw)
            }
            ApiError::ServerMisconfigured => write!(f, "Server configuration error"),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                msg,
                "SERVICE_UNAVAILABLE",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
            ApiError::NoFileProvided => (
                StatusCode::BAD_REQUEST,
                "No file provided".to_string(),
                "NO_FILE_PROVIDED",
            ),
            ApiError::NotAResume(reason) => (
                StatusCode::BAD_REQUEST,
                reason.unwrap_or_else(|| NOT_A_RESUME_FALLBACK.to_string()),
                "NOT_A_RESUME",
            ),
            ApiError::UpstreamFailure(detail) => {
                error!(detail = %detail, "Completion endpoint failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    EXTRACTION_FAILED.to_string(),
                    "UPSTREAM_FAILURE",
                )
            }
            ApiError::EmptyModelResponse => {
                error!("Completion response carried no text content");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    EXTRACTION_FAILED.to_string(),
                    "EMPTY_MODEL_RESPONSE",
                )
            }
            ApiError::MalformedModelJson(raw) => {
                error!(raw = %raw, "Failed to parse model response as JSON");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    EXTRACTION_FAILED.to_string(),
                    "MALFORMED_MODEL_JSON",
                )
            }
            ApiError::ServerMisconfigured => {
                error!("Missing OR_KEY - extraction credential not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                    "SERVER_MISCONFIGURED",
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn rendered(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_a_resume_carries_model_reason() {
        let (status, body) =
            rendered(ApiError::NotAResume(Some("This is an invoice.".to_string()))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "This is an invoice.");
        assert_eq!(body["code"], "NOT_A_RESUME");
    }

    #[tokio::test]
    async fn test_not_a_resume_falls_back_without_reason() {
        let (status, body) = rendered(ApiError::NotAResume(None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], NOT_A_RESUME_FALLBACK);
    }

    #[tokio::test]
    async fn test_upstream_detail_never_reaches_the_client() {
        let (status, body) =
            rendered(ApiError::UpstreamFailure("HTTP 502: provider down".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], EXTRACTION_FAILED);
        assert_eq!(body["code"], "UPSTREAM_FAILURE");
    }

    #[tokio::test]
    async fn test_no_file_provided_is_bad_request() {
        let (status, body) = rendered(ApiError::NoFileProvided).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file provided");
        assert_eq!(body["code"], "NO_FILE_PROVIDED");
    }
}
