use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

pub mod health;
pub mod scholarships;

pub const WELCOME_MESSAGE: &str = "Welcome to ScholarPath.ai API";

#[derive(Debug, Serialize, ToSchema)]
pub struct Welcome {
    #[schema(example = "Welcome to ScholarPath.ai API")]
    pub message: &'static str,
}

/// API landing message
#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses((status = 200, description = "Welcome message", body = Welcome))
)]
pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME_MESSAGE,
    })
}

/// Creates the API routes at the root, with state already applied.
///
/// `create_router` adds docs and cross-cutting layers on top.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(scholarships::router(state))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
