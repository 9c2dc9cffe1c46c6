//! Scholarships Domain
//!
//! Scholarship search over a PostgREST catalogue, semantic search through
//! an embedding provider, and per-user saved scholarships.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, identity, audit
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌────────────┐
//! │  Services   │ ──▶ │ Embeddings │  ← OpenAI
//! └──────┬──────┘     └────────────┘
//!        │  filters: store-side vs local constraints
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + in-memory / PostgREST
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::StaticIdentityResolver;
//! use domain_scholarships::{
//!     handlers,
//!     repository::{InMemorySavedScholarshipRepository, InMemoryScholarshipRepository},
//!     saved::SavedScholarshipService,
//!     service::ScholarshipService,
//! };
//!
//! let scholarships = InMemoryScholarshipRepository::new();
//! let saved = InMemorySavedScholarshipRepository::new(scholarships.clone());
//!
//! let router = handlers::router(
//!     ScholarshipService::new(scholarships),
//!     SavedScholarshipService::new(saved),
//!     Arc::new(StaticIdentityResolver::new("mock-user-id")),
//! );
//! ```

pub mod embedding;
pub mod error;
pub mod filters;
pub mod funds;
pub mod handlers;
pub mod models;
pub mod postgrest;
pub mod repository;
pub mod saved;
pub mod service;

// Re-export commonly used types
pub use embedding::{EmbeddingProvider, OpenAIConfig, OpenAIProvider};
pub use error::{ScholarshipError, ScholarshipResult};
pub use models::{
    EmbeddingModel, ListQuery, SaveConfirmation, SaveScholarshipRequest, SavedScholarship,
    SavedScholarshipDetails, Scholarship, SearchFilters, SearchRequest, VectorSearchRequest,
};
pub use postgrest::{PostgrestSavedScholarshipRepository, PostgrestScholarshipRepository};
pub use repository::{
    InMemorySavedScholarshipRepository, InMemoryScholarshipRepository,
    SavedScholarshipRepository, ScholarshipRepository,
};
pub use saved::{SavedScholarshipService, SavedScholarshipsConfig};
pub use service::ScholarshipService;
