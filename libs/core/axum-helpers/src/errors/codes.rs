//! Type-safe error codes for API responses.
//!
//! Each code carries a SCREAMING_SNAKE_CASE identifier for clients, an
//! integer for logs and dashboards, and a default message.
//!
//! Integer ranges:
//! - 1000-1999: request and client errors
//! - 2000-2999: upstream collaborators (data store, embedding provider)
//! - 5000-5999: serialization
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::InvalidId.as_str(), "INVALID_ID");
//! assert_eq!(ErrorCode::InvalidId.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body or query failed validation
    ValidationError,
    /// Path identifier is not an integer
    InvalidId,
    /// Request body could not be extracted as JSON
    JsonExtraction,
    NotFound,
    InternalError,
    /// Bearer credential missing or unusable
    Unauthorized,
    /// Request duplicates an existing record
    Conflict,
    ServiceUnavailable,

    /// The external data store rejected or failed a request
    StoreError,
    /// The embedding provider failed
    EmbeddingError,

    SerdeJsonError,
}

impl ErrorCode {
    /// Client-facing identifier, e.g. `"NOT_FOUND"`.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Integer code for logging and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Conflict => 1008,
            Self::ServiceUnavailable => 1011,

            Self::StoreError => 2001,
            Self::EmbeddingError => 2002,

            Self::SerdeJsonError => 5001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid identifier format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::Unauthorized => "Authentication required",
            Self::Conflict => "Resource already exists",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::StoreError => "The data store could not complete the request",
            Self::EmbeddingError => "The embedding provider could not complete the request",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::InvalidId.as_str(), "INVALID_ID");
        assert_eq!(ErrorCode::StoreError.as_str(), "STORE_ERROR");
        assert_eq!(ErrorCode::SerdeJsonError.as_str(), "SERDE_JSON_ERROR");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::Conflict.code(), 1008);
        assert_eq!(ErrorCode::EmbeddingError.code(), 2002);
    }

    #[test]
    fn test_display_matches_serde() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
            ErrorCode::StoreError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code));
        }
    }

    #[test]
    fn test_error_code_deserialization() {
        let code: ErrorCode = serde_json::from_str("\"CONFLICT\"").unwrap();
        assert_eq!(code, ErrorCode::Conflict);
    }
}
