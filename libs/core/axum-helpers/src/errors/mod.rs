pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::Level;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Scholarship 42 not found"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Structured details such as per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Errors rendered at the HTTP boundary.
///
/// Domain crates convert their own error enums into this type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream store error: {0}")]
    Store(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

struct Rendered {
    status: StatusCode,
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    level: Level,
    /// Logged, never sent to the client
    cause: Option<String>,
}

impl AppError {
    fn render(self) -> Rendered {
        let plain = |status, code: ErrorCode, message: String, level| Rendered {
            status,
            code,
            message,
            details: None,
            level,
            cause: None,
        };

        match self {
            AppError::SerdeJson(e) => plain(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::SerdeJsonError,
                ErrorCode::SerdeJsonError.default_message().to_string(),
                Level::ERROR,
            )
            .with_cause(e.to_string()),
            AppError::JsonExtractorRejection(e) => plain(
                e.status(),
                ErrorCode::JsonExtraction,
                e.body_text(),
                Level::WARN,
            ),
            AppError::ValidationError(e) => Rendered {
                status: StatusCode::BAD_REQUEST,
                code: ErrorCode::ValidationError,
                message: ErrorCode::ValidationError.default_message().to_string(),
                details: Some(validation_details(&e)),
                level: Level::INFO,
                cause: None,
            },
            AppError::InvalidId(raw) => plain(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidId,
                format!("Invalid identifier: {raw}"),
                Level::WARN,
            ),
            AppError::BadRequest(msg) => plain(
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationError,
                msg,
                Level::INFO,
            ),
            AppError::Unauthorized(msg) => plain(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                msg,
                Level::INFO,
            ),
            AppError::NotFound(msg) => {
                plain(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, Level::INFO)
            }
            AppError::Conflict(msg) => {
                plain(StatusCode::CONFLICT, ErrorCode::Conflict, msg, Level::INFO)
            }
            AppError::Store(msg) => plain(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::StoreError,
                ErrorCode::StoreError.default_message().to_string(),
                Level::ERROR,
            )
            .with_cause(msg),
            AppError::InternalServerError(msg) => plain(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                msg,
                Level::ERROR,
            ),
            AppError::ServiceUnavailable(msg) => plain(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                msg,
                Level::WARN,
            ),
        }
    }
}

impl Rendered {
    fn with_cause(mut self, cause: String) -> Self {
        self.cause = Some(cause);
        self
    }

    fn log(&self) {
        let code = self.code.code();
        let status = self.status.as_u16();
        let cause = self.cause.as_deref().unwrap_or_default();
        if self.level == Level::ERROR {
            tracing::error!(error_code = code, status, cause, "{}", self.message);
        } else if self.level == Level::WARN {
            tracing::warn!(error_code = code, status, "{}", self.message);
        } else {
            tracing::info!(error_code = code, status, "{}", self.message);
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = self.render();
        rendered.log();

        let body = Json(ErrorResponse {
            code: rendered.code.code(),
            error: rendered.code.as_str().to_string(),
            message: rendered.message,
            details: rendered.details,
        });

        (rendered.status, body).into_response()
    }
}

/// Flattens validator errors into `{field: [{code, message, params}]}`.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(fields)
}

/// Builds a bare error response for a code, using `message` verbatim.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
