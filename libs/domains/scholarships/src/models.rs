use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A scholarship record as stored in the `scholarships` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Scholarship {
    /// Store-assigned identifier
    pub id: i64,
    pub award_name: String,
    pub organization: Option<String>,
    /// Study levels the award is open to, e.g. "Undergraduate"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub level_of_study: Vec<String>,
    pub award_type: Option<String>,
    pub purpose: Option<String>,
    pub focus: Option<String>,
    pub qualifications: Option<String>,
    pub criteria: Option<String>,
    /// Free-text amount or range, e.g. "$1,000 - $5,000"
    pub funds: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2026-03-31")]
    pub deadline: Option<NaiveDate>,
    pub website: Option<String>,
    /// Cosine similarity, set only on semantic search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl Scholarship {
    /// Minimal record with only the required fields set.
    pub fn new(id: i64, award_name: impl Into<String>) -> Self {
        Self {
            id,
            award_name: award_name.into(),
            organization: None,
            level_of_study: Vec::new(),
            award_type: None,
            purpose: None,
            focus: None,
            qualifications: None,
            criteria: None,
            funds: None,
            deadline: None,
            website: None,
            similarity: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user/scholarship association as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SavedScholarship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: String,
    pub scholarship_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Row written to `saved_scholarships`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSavedScholarship {
    pub user_id: String,
    pub scholarship_id: i64,
}

/// A saved association joined with its scholarship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SavedScholarshipDetails {
    pub user_id: String,
    pub scholarship_id: i64,
    /// `null` when the referenced scholarship no longer exists
    #[serde(default, alias = "scholarships")]
    pub scholarship: Option<Scholarship>,
}

/// Structured filters for a search request
///
/// Funds bounds are amounts such as `"1000"`, `"$2,500"` or `"5k"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchFilters {
    pub level_of_study: Option<String>,
    pub award_type: Option<String>,
    pub min_funds: Option<String>,
    pub max_funds: Option<String>,
}

/// Body of `POST /scholarships/search`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SearchRequest {
    #[validate(length(max = 200))]
    pub search_term: Option<String>,
    pub filters: Option<SearchFilters>,
}

/// Body of `POST /scholarships/vector-search`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VectorSearchRequest {
    #[validate(custom(function = "validate_not_blank"), length(max = 1000))]
    #[schema(example = "nursing scholarships for rural students")]
    pub query: String,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of `POST /scholarships/save`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SaveScholarshipRequest {
    #[validate(range(min = 1))]
    pub scholarship_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveConfirmation {
    #[schema(example = "Scholarship saved successfully")]
    pub message: String,
}

impl SaveConfirmation {
    pub fn saved() -> Self {
        Self {
            message: "Scholarship saved successfully".to_string(),
        }
    }
}

/// Query parameters of `GET /scholarships`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Study level the award must include
    pub level_of_study: Option<String>,
    /// Exact award type, e.g. "Merit"
    pub award_type: Option<String>,
    /// Case-insensitive text to look for
    pub search_term: Option<String>,
}

impl ListQuery {
    pub fn into_parts(self) -> (SearchFilters, Option<String>) {
        let filters = SearchFilters {
            level_of_study: self.level_of_study,
            award_type: self.award_type,
            ..Default::default()
        };
        (filters, self.search_term)
    }
}

/// Parameters of the `match_scholarships` stored procedure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchParams {
    pub query_embedding: Vec<f32>,
    pub match_threshold: f64,
    pub match_count: usize,
}

/// Supported OpenAI embedding models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum EmbeddingModel {
    /// 1536 dimensions; the model the stored vectors were built with
    #[default]
    #[strum(serialize = "text-embedding-ada-002")]
    TextEmbeddingAda002,
    #[strum(serialize = "text-embedding-3-small")]
    TextEmbedding3Small,
    #[strum(serialize = "text-embedding-3-large")]
    TextEmbedding3Large,
}

impl EmbeddingModel {
    pub fn model_name(&self) -> &'static str {
        self.into()
    }

    pub fn dimension(&self) -> usize {
        match self {
            EmbeddingModel::TextEmbeddingAda002 => 1536,
            EmbeddingModel::TextEmbedding3Small => 1536,
            EmbeddingModel::TextEmbedding3Large => 3072,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResult {
    pub values: Vec<f32>,
    pub tokens_used: u32,
}
