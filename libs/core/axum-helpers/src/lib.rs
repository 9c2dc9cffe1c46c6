//! # Axum Helpers
//!
//! Shared HTTP plumbing for the ScholarPath services.
//!
//! - **[`errors`]**: `AppError`, `ErrorCode` and the JSON error body
//! - **[`extractors`]**: `IdPath` and `ValidatedJson`
//! - **[`auth`]**: bearer presence check and pluggable identity resolution
//! - **[`audit`]**: audit events on the `audit` target
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health/readiness, graceful shutdown

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    Identity, IdentityConfig, IdentityResolver, StaticIdentityResolver, bearer_token,
    require_identity,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{CorsConfig, create_cors_layer, create_permissive_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
