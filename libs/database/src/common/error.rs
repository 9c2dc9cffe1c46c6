/// Errors raised while talking to the data store.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Transport failure: connect, timeout, TLS, body read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-2xx status
    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DatabaseError {
    /// PostgREST reports unique-constraint violations as 409.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DatabaseError::Status { status: 409, .. })
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = DatabaseError::Status {
            status: 404,
            body: r#"{"message":"relation does not exist"}"#.to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_detection() {
        let err = DatabaseError::Status {
            status: 409,
            body: "duplicate key value".to_string(),
        };
        assert!(err.is_conflict());
    }
}
