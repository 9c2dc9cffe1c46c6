//! Application state management.
//!
//! Shared by the route builders and the readiness handler:
//! - Configuration
//! - PostgREST store client
//! - Embedding provider, when configured
//! - Identity resolver for bearer-protected routes

use axum_helpers::IdentityResolver;
use database::postgrest::PostgrestClient;
use domain_scholarships::EmbeddingProvider;
use std::sync::Arc;

/// Shared application state.
///
/// Cloning is cheap: the store client wraps a pooled `reqwest::Client` and the
/// rest are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgREST client for the scholarship store
    pub store: PostgrestClient,
    pub embeddings: Option<Arc<dyn EmbeddingProvider>>,
    pub identity_resolver: Arc<dyn IdentityResolver>,
}
