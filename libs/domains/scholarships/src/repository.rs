use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::ScholarshipResult;
use crate::filters::StoreQuery;
use crate::models::{
    MatchParams, NewSavedScholarship, SavedScholarship, SavedScholarshipDetails, Scholarship,
};

/// Read access to the `scholarships` collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScholarshipRepository: Send + Sync {
    /// Records passing every filter in `query`, in store order
    async fn find(&self, query: StoreQuery) -> ScholarshipResult<Vec<Scholarship>>;

    /// Get a scholarship by ID
    async fn get_by_id(&self, id: i64) -> ScholarshipResult<Option<Scholarship>>;

    /// Records most similar to an embedding, best first, with `similarity` set
    async fn match_by_embedding(&self, params: MatchParams) -> ScholarshipResult<Vec<Scholarship>>;
}

/// Persistence for user/scholarship associations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedScholarshipRepository: Send + Sync {
    /// Insert an association; `None` when the store echoes no row back
    async fn insert(&self, record: NewSavedScholarship)
    -> ScholarshipResult<Option<SavedScholarship>>;

    /// Check if the user already saved the scholarship
    async fn exists(&self, user_id: &str, scholarship_id: i64) -> ScholarshipResult<bool>;

    /// Every association of the user joined with its scholarship
    async fn list_for_user(&self, user_id: &str) -> ScholarshipResult<Vec<SavedScholarshipDetails>>;
}

#[derive(Debug, Clone)]
struct StoredScholarship {
    scholarship: Scholarship,
    embedding: Option<Vec<f32>>,
}

/// In-memory implementation of ScholarshipRepository (for development/testing)
///
/// Iterates in ascending id order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryScholarshipRepository {
    scholarships: Arc<RwLock<BTreeMap<i64, StoredScholarship>>>,
}

impl InMemoryScholarshipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository seeded with `scholarships`.
    pub fn with_scholarships(scholarships: impl IntoIterator<Item = Scholarship>) -> Self {
        let map = scholarships
            .into_iter()
            .map(|s| {
                (
                    s.id,
                    StoredScholarship {
                        scholarship: s,
                        embedding: None,
                    },
                )
            })
            .collect();
        Self {
            scholarships: Arc::new(RwLock::new(map)),
        }
    }

    /// Insert or replace a record.
    pub async fn insert(&self, scholarship: Scholarship) {
        let mut scholarships = self.scholarships.write().await;
        let embedding = scholarships
            .get(&scholarship.id)
            .and_then(|stored| stored.embedding.clone());
        scholarships.insert(
            scholarship.id,
            StoredScholarship {
                scholarship,
                embedding,
            },
        );
    }

    /// Attach an embedding to an existing record; `false` when the id is unknown.
    pub async fn set_embedding(&self, id: i64, embedding: Vec<f32>) -> bool {
        let mut scholarships = self.scholarships.write().await;
        match scholarships.get_mut(&id) {
            Some(stored) => {
                stored.embedding = Some(embedding);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ScholarshipRepository for InMemoryScholarshipRepository {
    async fn find(&self, query: StoreQuery) -> ScholarshipResult<Vec<Scholarship>> {
        let scholarships = self.scholarships.read().await;
        Ok(scholarships
            .values()
            .map(|stored| &stored.scholarship)
            .filter(|s| query.matches(s))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> ScholarshipResult<Option<Scholarship>> {
        let scholarships = self.scholarships.read().await;
        Ok(scholarships.get(&id).map(|stored| stored.scholarship.clone()))
    }

    async fn match_by_embedding(&self, params: MatchParams) -> ScholarshipResult<Vec<Scholarship>> {
        let scholarships = self.scholarships.read().await;

        let mut matches: Vec<Scholarship> = scholarships
            .values()
            .filter_map(|stored| {
                let embedding = stored.embedding.as_ref()?;
                let similarity = cosine_similarity(&params.query_embedding, embedding)?;
                (similarity > params.match_threshold).then(|| {
                    let mut scholarship = stored.scholarship.clone();
                    scholarship.similarity = Some(similarity);
                    scholarship
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(params.match_count);

        Ok(matches)
    }
}

/// `None` for mismatched lengths or zero vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// In-memory implementation of SavedScholarshipRepository (for development/testing)
///
/// Joins against the given scholarship repository when listing.
#[derive(Debug, Clone)]
pub struct InMemorySavedScholarshipRepository {
    saved: Arc<RwLock<HashMap<String, Vec<SavedScholarship>>>>,
    next_id: Arc<AtomicI64>,
    scholarships: InMemoryScholarshipRepository,
}

impl InMemorySavedScholarshipRepository {
    pub fn new(scholarships: InMemoryScholarshipRepository) -> Self {
        Self {
            saved: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            scholarships,
        }
    }
}

#[async_trait]
impl SavedScholarshipRepository for InMemorySavedScholarshipRepository {
    async fn insert(
        &self,
        record: NewSavedScholarship,
    ) -> ScholarshipResult<Option<SavedScholarship>> {
        let saved = SavedScholarship {
            id: Some(self.next_id.fetch_add(1, Ordering::Relaxed)),
            user_id: record.user_id,
            scholarship_id: record.scholarship_id,
            created_at: Some(Utc::now()),
        };

        let mut by_user = self.saved.write().await;
        by_user
            .entry(saved.user_id.clone())
            .or_default()
            .push(saved.clone());

        tracing::info!(
            user_id = %saved.user_id,
            scholarship_id = saved.scholarship_id,
            "Saved scholarship"
        );
        Ok(Some(saved))
    }

    async fn exists(&self, user_id: &str, scholarship_id: i64) -> ScholarshipResult<bool> {
        let by_user = self.saved.read().await;
        Ok(by_user
            .get(user_id)
            .is_some_and(|rows| rows.iter().any(|r| r.scholarship_id == scholarship_id)))
    }

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> ScholarshipResult<Vec<SavedScholarshipDetails>> {
        let rows = {
            let by_user = self.saved.read().await;
            by_user.get(user_id).cloned().unwrap_or_default()
        };

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(SavedScholarshipDetails {
                scholarship: self.scholarships.get_by_id(row.scholarship_id).await?,
                user_id: row.user_id,
                scholarship_id: row.scholarship_id,
            });
        }
        Ok(details)
    }
}
