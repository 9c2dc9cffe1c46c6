use axum::Router;
use domain_scholarships::{
    PostgrestSavedScholarshipRepository, PostgrestScholarshipRepository,
    SavedScholarshipService, ScholarshipService, handlers,
};

pub fn router(state: &crate::state::AppState) -> Router {
    let mut scholarships =
        ScholarshipService::new(PostgrestScholarshipRepository::new(state.store.clone()));
    if let Some(provider) = &state.embeddings {
        scholarships = scholarships.with_embedding_provider(provider.clone());
    }

    let saved = SavedScholarshipService::with_config(
        PostgrestSavedScholarshipRepository::new(state.store.clone()),
        state.config.saved,
    );

    handlers::router(scholarships, saved, state.identity_resolver.clone())
}
