//! Caller identity.
//!
//! Protected routes require an `Authorization: Bearer <token>` header. The
//! token is handed to an [`IdentityResolver`], and the resolved [`Identity`]
//! is stored in request extensions for handlers to extract.
//!
//! ```ignore
//! use axum_helpers::auth::{IdentityResolver, StaticIdentityResolver, require_identity};
//!
//! let resolver: Arc<dyn IdentityResolver> = Arc::new(StaticIdentityResolver::new("mock-user-id"));
//!
//! let protected = Router::new()
//!     .route("/scholarships/saved", get(list_saved))
//!     .route_layer(axum::middleware::from_fn_with_state(resolver, require_identity));
//! ```

pub mod config;
pub mod identity;
pub mod middleware;

pub use config::IdentityConfig;
pub use identity::{Identity, IdentityResolver, StaticIdentityResolver};
pub use middleware::{bearer_token, require_identity};
