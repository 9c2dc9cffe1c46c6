use super::identity::IdentityResolver;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Token from `Authorization: Bearer <token>`, if present and non-empty.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Rejects requests without a bearer credential and stores the resolved
/// [`Identity`](super::Identity) in request extensions.
pub async fn require_identity(
    State(resolver): State<Arc<dyn IdentityResolver>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(request.headers()) else {
        tracing::debug!("No bearer credential on protected route");
        return Err(AppError::Unauthorized(
            "Missing bearer credential".to_string(),
        ));
    };

    let identity = resolver.resolve(token).await?;
    tracing::debug!(user_id = %identity.user_id, "Resolved caller identity");

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::MockIdentityResolver;
    use crate::auth::{Identity, StaticIdentityResolver};
    use axum::{
        Router,
        body::Body,
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    fn app(resolver: Arc<dyn IdentityResolver>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|identity: Identity| async move { identity.user_id }),
            )
            .route_layer(middleware::from_fn_with_state(resolver, require_identity))
    }

    #[tokio::test]
    async fn test_missing_bearer_is_unauthorized() {
        let response = app(Arc::new(StaticIdentityResolver::new("u1")))
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_resolved_identity_reaches_handler() {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .withf(|token| token == "t0ken")
            .times(1)
            .returning(|_| {
                Ok(Identity {
                    user_id: "student-9".to_string(),
                })
            });

        let response = app(Arc::new(resolver))
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, "Bearer t0ken")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_resolver_rejection_is_returned() {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Err(AppError::Unauthorized("revoked".to_string())));

        let response = app(Arc::new(resolver))
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, "Bearer stale")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
