use async_trait::async_trait;
use database::DatabaseError;
use database::postgrest::PostgrestClient;
use serde_json::Value;

use crate::error::{ScholarshipError, ScholarshipResult};
use crate::filters::{StoreFilter, StoreQuery};
use crate::models::{
    MatchParams, NewSavedScholarship, SavedScholarship, SavedScholarshipDetails, Scholarship,
};
use crate::repository::{SavedScholarshipRepository, ScholarshipRepository};

pub const SCHOLARSHIPS_TABLE: &str = "scholarships";
pub const SAVED_SCHOLARSHIPS_TABLE: &str = "saved_scholarships";
/// Stored procedure ranking scholarships by embedding similarity
pub const MATCH_FUNCTION: &str = "match_scholarships";

/// Association columns plus the embedded scholarship resource
const SAVED_WITH_SCHOLARSHIP: &str = "user_id,scholarship_id,scholarships(*)";

/// PostgREST-backed ScholarshipRepository
#[derive(Debug, Clone)]
pub struct PostgrestScholarshipRepository {
    client: PostgrestClient,
}

impl PostgrestScholarshipRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScholarshipRepository for PostgrestScholarshipRepository {
    async fn find(&self, query: StoreQuery) -> ScholarshipResult<Vec<Scholarship>> {
        let mut request = self.client.from(SCHOLARSHIPS_TABLE).select("*");

        for filter in &query.filters {
            request = match filter {
                StoreFilter::LevelOfStudyContains(level) => {
                    request.contains("level_of_study", level)
                }
                StoreFilter::AwardTypeEquals(award_type) => request.eq("award_type", award_type),
                StoreFilter::AwardNameContains(term) => request.ilike_contains("award_name", term),
            };
        }

        Ok(request.execute().await?)
    }

    async fn get_by_id(&self, id: i64) -> ScholarshipResult<Option<Scholarship>> {
        let rows: Vec<Scholarship> = self
            .client
            .from(SCHOLARSHIPS_TABLE)
            .select("*")
            .eq("id", id)
            .limit(1)
            .execute()
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn match_by_embedding(&self, params: MatchParams) -> ScholarshipResult<Vec<Scholarship>> {
        Ok(self.client.rpc(MATCH_FUNCTION, &params).await?)
    }
}

/// PostgREST-backed SavedScholarshipRepository
#[derive(Debug, Clone)]
pub struct PostgrestSavedScholarshipRepository {
    client: PostgrestClient,
}

impl PostgrestSavedScholarshipRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SavedScholarshipRepository for PostgrestSavedScholarshipRepository {
    async fn insert(
        &self,
        record: NewSavedScholarship,
    ) -> ScholarshipResult<Option<SavedScholarship>> {
        let rows: Vec<SavedScholarship> = self
            .client
            .from(SAVED_SCHOLARSHIPS_TABLE)
            .insert(&record)
            .await
            .map_err(|e| map_insert_error(e, record.scholarship_id))?;

        Ok(rows.into_iter().next())
    }

    async fn exists(&self, user_id: &str, scholarship_id: i64) -> ScholarshipResult<bool> {
        let rows: Vec<Value> = self
            .client
            .from(SAVED_SCHOLARSHIPS_TABLE)
            .select("scholarship_id")
            .eq("user_id", user_id)
            .eq("scholarship_id", scholarship_id)
            .limit(1)
            .execute()
            .await?;

        Ok(!rows.is_empty())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> ScholarshipResult<Vec<SavedScholarshipDetails>> {
        Ok(self
            .client
            .from(SAVED_SCHOLARSHIPS_TABLE)
            .select(SAVED_WITH_SCHOLARSHIP)
            .eq("user_id", user_id)
            .execute()
            .await?)
    }
}

/// A unique index on the association table surfaces as 409.
fn map_insert_error(err: DatabaseError, scholarship_id: i64) -> ScholarshipError {
    if err.is_conflict() {
        ScholarshipError::AlreadySaved(scholarship_id)
    } else {
        err.into()
    }
}
