use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_config::ConfigError;
use database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScholarshipError {
    #[error("Scholarship not found: {0}")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Scholarship {0} is already saved for this user")]
    AlreadySaved(i64),

    /// The store accepted the insert but returned no row.
    #[error("Store returned no row when saving scholarship {0}")]
    SaveRejected(i64),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ScholarshipResult<T> = Result<T, ScholarshipError>;

impl From<DatabaseError> for ScholarshipError {
    fn from(err: DatabaseError) -> Self {
        ScholarshipError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for ScholarshipError {
    fn from(err: reqwest::Error) -> Self {
        ScholarshipError::Embedding(err.to_string())
    }
}

impl From<ConfigError> for ScholarshipError {
    fn from(err: ConfigError) -> Self {
        ScholarshipError::Config(err.to_string())
    }
}

/// Convert ScholarshipError to AppError for standardized error responses
impl From<ScholarshipError> for AppError {
    fn from(err: ScholarshipError) -> Self {
        match err {
            ScholarshipError::NotFound(_) => {
                AppError::NotFound("Scholarship not found".to_string())
            }
            ScholarshipError::Validation(msg) => AppError::BadRequest(msg),
            ScholarshipError::AlreadySaved(id) => {
                AppError::Conflict(format!("Scholarship {} is already saved", id))
            }
            ScholarshipError::SaveRejected(_) => {
                AppError::BadRequest("Failed to save scholarship".to_string())
            }
            ScholarshipError::Store(msg) => AppError::Store(msg),
            ScholarshipError::Embedding(msg) => {
                AppError::InternalServerError(format!("Embedding error: {}", msg))
            }
            ScholarshipError::Config(msg) => {
                AppError::InternalServerError(format!("Config error: {}", msg))
            }
        }
    }
}

impl IntoResponse for ScholarshipError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ScholarshipError::NotFound(9), StatusCode::NOT_FOUND),
            (
                ScholarshipError::Validation("bad bound".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ScholarshipError::AlreadySaved(3), StatusCode::CONFLICT),
            (ScholarshipError::SaveRejected(3), StatusCode::BAD_REQUEST),
            (
                ScholarshipError::Store("timeout".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_database_status_becomes_store_error() {
        let err: ScholarshipError = DatabaseError::Status {
            status: 503,
            body: "unavailable".into(),
        }
        .into();
        assert!(matches!(err, ScholarshipError::Store(_)));
    }
}
