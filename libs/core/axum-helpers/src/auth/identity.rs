use crate::errors::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The caller on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

/// Maps a bearer token to an [`Identity`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, AppError>;
}

/// Resolves every token to the same configured user.
///
/// Token contents are not verified.
#[derive(Debug, Clone)]
pub struct StaticIdentityResolver {
    user_id: String,
}

impl StaticIdentityResolver {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, _token: &str) -> Result<Identity, AppError> {
        Ok(Identity {
            user_id: self.user_id.clone(),
        })
    }
}

/// Reads the identity stored by [`require_identity`](super::require_identity).
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Missing bearer credential".to_string()))
    }
}
