use axum_helpers::Identity;
use core_config::{ConfigError, FromEnv, env_parse};
use observability::{SaveOutcome, ScholarshipMetrics};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ScholarshipError, ScholarshipResult};
use crate::models::{NewSavedScholarship, SavedScholarship, SavedScholarshipDetails};
use crate::repository::SavedScholarshipRepository;

/// Save behaviour settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedScholarshipsConfig {
    /// Reject a second save of the same scholarship by the same user
    pub unique: bool,
}

/// Environment variables:
/// - `SAVED_SCHOLARSHIPS_UNIQUE` (optional, default: false)
impl FromEnv for SavedScholarshipsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            unique: env_parse("SAVED_SCHOLARSHIPS_UNIQUE", false)?,
        })
    }
}

/// Service layer for a user's saved scholarships
pub struct SavedScholarshipService<S: SavedScholarshipRepository> {
    repository: Arc<S>,
    config: SavedScholarshipsConfig,
}

impl<S: SavedScholarshipRepository> SavedScholarshipService<S> {
    pub fn new(repository: S) -> Self {
        Self::with_config(repository, SavedScholarshipsConfig::default())
    }

    pub fn with_config(repository: S, config: SavedScholarshipsConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            config,
        }
    }

    /// Associates the scholarship with the caller.
    ///
    /// An insert the store answers without a row is `SaveRejected`. With
    /// uniqueness enabled a repeated save is `AlreadySaved`.
    pub async fn save(
        &self,
        identity: &Identity,
        scholarship_id: i64,
    ) -> ScholarshipResult<SavedScholarship> {
        if self.config.unique
            && self
                .repository
                .exists(&identity.user_id, scholarship_id)
                .await
                .inspect_err(|_| ScholarshipMetrics::record_save(SaveOutcome::Failed))?
        {
            ScholarshipMetrics::record_save(SaveOutcome::Duplicate);
            return Err(ScholarshipError::AlreadySaved(scholarship_id));
        }

        let record = NewSavedScholarship {
            user_id: identity.user_id.clone(),
            scholarship_id,
        };

        match self.repository.insert(record).await {
            Ok(Some(saved)) => {
                ScholarshipMetrics::record_save(SaveOutcome::Saved);
                info!(
                    user_id = %saved.user_id,
                    scholarship_id = saved.scholarship_id,
                    "Scholarship saved"
                );
                Ok(saved)
            }
            Ok(None) => {
                ScholarshipMetrics::record_save(SaveOutcome::Rejected);
                Err(ScholarshipError::SaveRejected(scholarship_id))
            }
            Err(ScholarshipError::AlreadySaved(id)) => {
                ScholarshipMetrics::record_save(SaveOutcome::Duplicate);
                Err(ScholarshipError::AlreadySaved(id))
            }
            Err(e) => {
                ScholarshipMetrics::record_save(SaveOutcome::Failed);
                Err(e)
            }
        }
    }

    /// The caller's saved scholarships; a store failure yields an empty list.
    pub async fn list(
        &self,
        identity: &Identity,
    ) -> ScholarshipResult<Vec<SavedScholarshipDetails>> {
        match self.repository.list_for_user(&identity.user_id).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                warn!(
                    user_id = %identity.user_id,
                    error = %e,
                    "Saved scholarships lookup failed"
                );
                ScholarshipMetrics::record_store_read_failure("list_saved");
                Ok(Vec::new())
            }
        }
    }
}
