//! JSON extractor with validation through the `validator` crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes the body as JSON, then runs `Validate`.
///
/// JSON syntax and type errors keep axum's rejection status (400/415/422);
/// validation failures become `400 VALIDATION_ERROR` with per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct SaveRequest {
///     #[validate(range(min = 1))]
///     scholarship_id: i64,
/// }
///
/// async fn save(ValidatedJson(payload): ValidatedJson<SaveRequest>) -> StatusCode {
///     StatusCode::OK
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Query {
        #[validate(length(min = 1))]
        query: String,
    }

    async fn post_json(body: &str) -> StatusCode {
        let app = Router::new().route(
            "/search",
            post(|ValidatedJson(q): ValidatedJson<Query>| async move { q.query }),
        );

        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        assert_eq!(post_json(r#"{"query":"nursing"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failed_validation_is_bad_request() {
        assert_eq!(post_json(r#"{"query":""}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_field_keeps_axum_status() {
        assert_eq!(
            post_json(r#"{}"#).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
