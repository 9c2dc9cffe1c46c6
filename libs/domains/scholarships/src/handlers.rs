use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    middleware,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, Identity, IdentityResolver, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    require_identity,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ScholarshipError, ScholarshipResult};
use crate::models::{
    ListQuery, SaveConfirmation, SaveScholarshipRequest, SavedScholarship,
    SavedScholarshipDetails, Scholarship, SearchFilters, SearchRequest, VectorSearchRequest,
};
use crate::repository::{SavedScholarshipRepository, ScholarshipRepository};
use crate::saved::SavedScholarshipService;
use crate::service::ScholarshipService;

pub const TAG: &str = "scholarships";

/// OpenAPI documentation for Scholarships API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_scholarships,
        get_scholarship,
        search_scholarships,
        vector_search,
        save_scholarship,
        list_saved_scholarships,
    ),
    components(
        schemas(
            Scholarship,
            SavedScholarship,
            SavedScholarshipDetails,
            SearchFilters,
            SearchRequest,
            VectorSearchRequest,
            SaveScholarshipRequest,
            SaveConfirmation
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Scholarship search and saved scholarships")
    )
)]
pub struct ApiDoc;

/// Services shared by every scholarship handler
pub struct ScholarshipState<R: ScholarshipRepository, S: SavedScholarshipRepository> {
    pub scholarships: Arc<ScholarshipService<R>>,
    pub saved: Arc<SavedScholarshipService<S>>,
}

impl<R: ScholarshipRepository, S: SavedScholarshipRepository> Clone for ScholarshipState<R, S> {
    fn clone(&self) -> Self {
        Self {
            scholarships: Arc::clone(&self.scholarships),
            saved: Arc::clone(&self.saved),
        }
    }
}

/// Create the scholarship router with all HTTP endpoints
///
/// Saving and listing saved scholarships require a bearer credential,
/// resolved to an [`Identity`] by `identity_resolver`.
pub fn router<R, S>(
    scholarships: ScholarshipService<R>,
    saved: SavedScholarshipService<S>,
    identity_resolver: Arc<dyn IdentityResolver>,
) -> Router
where
    R: ScholarshipRepository + 'static,
    S: SavedScholarshipRepository + 'static,
{
    let state = ScholarshipState {
        scholarships: Arc::new(scholarships),
        saved: Arc::new(saved),
    };

    let public = Router::new()
        .route("/scholarships", get(list_scholarships::<R, S>))
        .route("/scholarships/", get(list_scholarships::<R, S>))
        .route("/scholarships/search", post(search_scholarships::<R, S>))
        .route("/scholarships/vector-search", post(vector_search::<R, S>))
        .route("/scholarships/{id}", get(get_scholarship::<R, S>));

    let protected = Router::new()
        .route("/scholarships/save", post(save_scholarship::<R, S>))
        .route("/scholarships/saved", get(list_saved_scholarships::<R, S>))
        .route_layer(middleware::from_fn_with_state(
            identity_resolver,
            require_identity,
        ));

    public.merge(protected).with_state(state)
}

/// List scholarships with optional filters
#[utoipa::path(
    get,
    path = "/scholarships",
    tag = TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "Matching scholarships", body = Vec<Scholarship>),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn list_scholarships<R: ScholarshipRepository, S: SavedScholarshipRepository>(
    State(state): State<ScholarshipState<R, S>>,
    Query(query): Query<ListQuery>,
) -> ScholarshipResult<Json<Vec<Scholarship>>> {
    let scholarships = state.scholarships.list_scholarships(query).await?;
    Ok(Json(scholarships))
}

/// Get a scholarship by ID
#[utoipa::path(
    get,
    path = "/scholarships/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Scholarship ID")
    ),
    responses(
        (status = 200, description = "Scholarship found", body = Scholarship),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_scholarship<R: ScholarshipRepository, S: SavedScholarshipRepository>(
    State(state): State<ScholarshipState<R, S>>,
    IdPath(id): IdPath,
) -> ScholarshipResult<Json<Scholarship>> {
    let scholarship = state.scholarships.get_scholarship(id).await?;
    Ok(Json(scholarship))
}

/// Search scholarships by term and structured filters
///
/// With any filter present the term is matched against all text fields,
/// otherwise against the award name only.
#[utoipa::path(
    post,
    path = "/scholarships/search",
    tag = TAG,
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching scholarships", body = Vec<Scholarship>),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn search_scholarships<R: ScholarshipRepository, S: SavedScholarshipRepository>(
    State(state): State<ScholarshipState<R, S>>,
    ValidatedJson(request): ValidatedJson<SearchRequest>,
) -> ScholarshipResult<Json<Vec<Scholarship>>> {
    let scholarships = state.scholarships.search_scholarships(request).await?;
    Ok(Json(scholarships))
}

/// Semantic search over scholarship embeddings
///
/// Falls back to text search when embeddings are unavailable.
#[utoipa::path(
    post,
    path = "/scholarships/vector-search",
    tag = TAG,
    request_body = VectorSearchRequest,
    responses(
        (status = 200, description = "Scholarships ranked by similarity", body = Vec<Scholarship>),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn vector_search<R: ScholarshipRepository, S: SavedScholarshipRepository>(
    State(state): State<ScholarshipState<R, S>>,
    ValidatedJson(request): ValidatedJson<VectorSearchRequest>,
) -> ScholarshipResult<Json<Vec<Scholarship>>> {
    let scholarships = state
        .scholarships
        .vector_search(request.query.trim())
        .await?;
    Ok(Json(scholarships))
}

/// Save a scholarship for the caller
#[utoipa::path(
    post,
    path = "/scholarships/save",
    tag = TAG,
    request_body = SaveScholarshipRequest,
    responses(
        (status = 200, description = "Scholarship saved", body = SaveConfirmation),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn save_scholarship<R: ScholarshipRepository, S: SavedScholarshipRepository>(
    State(state): State<ScholarshipState<R, S>>,
    identity: Identity,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<SaveScholarshipRequest>,
) -> ScholarshipResult<Json<SaveConfirmation>> {
    let scholarship_id = request.scholarship_id;
    let result = state.saved.save(&identity, scholarship_id).await;

    let outcome = match &result {
        Ok(_) => AuditOutcome::Success,
        Err(ScholarshipError::AlreadySaved(_)) => AuditOutcome::Denied,
        Err(_) => AuditOutcome::Failure,
    };
    AuditEvent::new("scholarship.save", outcome)
        .with_user(identity.user_id.as_str())
        .with_resource(format!("scholarship:{}", scholarship_id))
        .with_request_headers(&headers)
        .with_details(json!({ "scholarship_id": scholarship_id }))
        .log();

    result?;
    Ok(Json(SaveConfirmation::saved()))
}

/// List the caller's saved scholarships
#[utoipa::path(
    get,
    path = "/scholarships/saved",
    tag = TAG,
    responses(
        (status = 200, description = "Saved scholarships with details", body = Vec<SavedScholarshipDetails>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_saved_scholarships<R: ScholarshipRepository, S: SavedScholarshipRepository>(
    State(state): State<ScholarshipState<R, S>>,
    identity: Identity,
) -> ScholarshipResult<Json<Vec<SavedScholarshipDetails>>> {
    let saved = state.saved.list(&identity).await?;
    Ok(Json(saved))
}
