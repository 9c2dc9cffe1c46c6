use observability::{ScholarshipMetrics, SearchStrategyLabel, VectorSearchOutcome};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{ScholarshipError, ScholarshipResult};
use crate::filters::{
    Constraint, Placement, StoreFilter, StoreQuery, TextStrategy, constraints_from,
    normalize_term, searchable_text,
};
use crate::models::{ListQuery, MatchParams, Scholarship, SearchFilters, SearchRequest};
use crate::repository::ScholarshipRepository;

/// Minimum similarity for a semantic match
pub const MATCH_THRESHOLD: f64 = 0.7;
/// Maximum number of semantic matches returned
pub const MATCH_COUNT: usize = 10;

/// Service layer for scholarship reads and searches
pub struct ScholarshipService<R: ScholarshipRepository> {
    repository: Arc<R>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl<R: ScholarshipRepository> ScholarshipService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            embedding_provider: None,
        }
    }

    pub fn with_embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// `GET /scholarships`: level of study, award type and a search term.
    pub async fn list_scholarships(&self, query: ListQuery) -> ScholarshipResult<Vec<Scholarship>> {
        let (filters, term) = query.into_parts();
        self.resolve(filters, term.as_deref()).await
    }

    /// `POST /scholarships/search`
    pub async fn search_scholarships(
        &self,
        request: SearchRequest,
    ) -> ScholarshipResult<Vec<Scholarship>> {
        self.resolve(
            request.filters.unwrap_or_default(),
            request.search_term.as_deref(),
        )
        .await
    }

    /// Records satisfying every supplied constraint, in store order.
    ///
    /// Fails only when a funds bound is not an amount. A store failure is
    /// logged and yields no records.
    pub async fn resolve(
        &self,
        filters: SearchFilters,
        term: Option<&str>,
    ) -> ScholarshipResult<Vec<Scholarship>> {
        self.resolve_with(filters, term, None).await
    }

    /// `resolve` with the term strategy pinned instead of chosen from the
    /// constraints.
    async fn resolve_with(
        &self,
        filters: SearchFilters,
        term: Option<&str>,
        pinned: Option<TextStrategy>,
    ) -> ScholarshipResult<Vec<Scholarship>> {
        let constraints = constraints_from(&filters)?;
        let term = normalize_term(term);
        let strategy = term
            .as_ref()
            .map(|_| pinned.unwrap_or_else(|| TextStrategy::for_constraints(&constraints)));

        let mut store_filters: Vec<StoreFilter> = constraints
            .iter()
            .filter_map(Constraint::store_filter)
            .collect();
        if let (Some(term), Some(TextStrategy::AwardName)) = (&term, strategy) {
            store_filters.push(StoreFilter::AwardNameContains(term.clone()));
        }

        debug!(
            constraints = constraints.len(),
            strategy = ?strategy,
            "Resolving scholarship query"
        );

        let fetched = match self.repository.find(StoreQuery::new(store_filters)).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Scholarship query failed, returning no results");
                ScholarshipMetrics::record_store_read_failure("find");
                Vec::new()
            }
        };

        let local: Vec<&Constraint> = constraints
            .iter()
            .filter(|c| c.placement() == Placement::Local)
            .collect();
        // The store's award-name match can be looser than a literal substring
        // (an asterisk is a wildcard there), so it is rechecked here.
        let needle = term.as_ref().map(|term| term.to_lowercase());

        let results: Vec<Scholarship> = fetched
            .into_iter()
            .filter(|s| local.iter().all(|c| c.matches(s)))
            .filter(|s| match (needle.as_deref(), strategy) {
                (Some(needle), Some(TextStrategy::AwardName)) => {
                    s.award_name.to_lowercase().contains(needle)
                }
                (Some(needle), Some(TextStrategy::AllFields)) => {
                    searchable_text(s).contains(needle)
                }
                _ => true,
            })
            .collect();

        let label = match strategy {
            None => SearchStrategyLabel::Unfiltered,
            Some(TextStrategy::AwardName) => SearchStrategyLabel::AwardName,
            Some(TextStrategy::AllFields) => SearchStrategyLabel::AllFields,
        };
        ScholarshipMetrics::record_search(label, results.len());

        Ok(results)
    }

    /// Get a scholarship by ID
    ///
    /// A failed store read is reported as not found.
    pub async fn get_scholarship(&self, id: i64) -> ScholarshipResult<Scholarship> {
        match self.repository.get_by_id(id).await {
            Ok(Some(scholarship)) => Ok(scholarship),
            Ok(None) => Err(ScholarshipError::NotFound(id)),
            Err(e) => {
                warn!(scholarship_id = id, error = %e, "Scholarship lookup failed");
                ScholarshipMetrics::record_store_read_failure("get_by_id");
                Err(ScholarshipError::NotFound(id))
            }
        }
    }

    /// Ranked semantic matches for `text`.
    ///
    /// Any embedding or store failure falls back to an unfiltered text
    /// search matching `text` against every searchable field.
    pub async fn vector_search(&self, text: &str) -> ScholarshipResult<Vec<Scholarship>> {
        match self.semantic_matches(text).await {
            Ok(matches) => {
                ScholarshipMetrics::record_vector_search(VectorSearchOutcome::Semantic);
                Ok(matches)
            }
            Err(e) => {
                warn!(error = %e, "Vector search failed, falling back to text search");
                ScholarshipMetrics::record_vector_search(VectorSearchOutcome::Fallback);
                self.resolve_with(
                    SearchFilters::default(),
                    Some(text),
                    Some(TextStrategy::AllFields),
                )
                .await
            }
        }
    }

    async fn semantic_matches(&self, text: &str) -> ScholarshipResult<Vec<Scholarship>> {
        let provider = self.embedding_provider.as_ref().ok_or_else(|| {
            ScholarshipError::Config("No embedding provider configured".to_string())
        })?;

        let embedding = provider.embed(text).await?;
        if embedding.values.is_empty() {
            return Err(ScholarshipError::Embedding(
                "Provider returned an empty embedding".to_string(),
            ));
        }
        debug!(
            model = %provider.model(),
            tokens = embedding.tokens_used,
            "Embedded vector search query"
        );

        self.repository
            .match_by_embedding(MatchParams {
                query_embedding: embedding.values,
                match_threshold: MATCH_THRESHOLD,
                match_count: MATCH_COUNT,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::models::{EmbeddingModel, EmbeddingResult};
    use crate::repository::{InMemoryScholarshipRepository, MockScholarshipRepository};

    fn scholarship(
        id: i64,
        name: &str,
        award_type: &str,
        level: &str,
        funds: Option<&str>,
    ) -> Scholarship {
        let mut s = Scholarship::new(id, name);
        s.award_type = Some(award_type.into());
        s.level_of_study = vec![level.into()];
        s.funds = funds.map(str::to_string);
        s
    }

    fn catalogue() -> InMemoryScholarshipRepository {
        let mut engineering = scholarship(
            1,
            "Prairie Merit Award",
            "Merit",
            "Undergraduate",
            Some("$1,000 - $2,500"),
        );
        engineering.focus = Some("Engineering and applied science".into());

        let mut small = scholarship(
            2,
            "Engineering Starter",
            "Merit",
            "Undergraduate",
            Some("$500"),
        );
        small.purpose = Some("Books for engineering students".into());

        let mut varies = scholarship(
            3,
            "Open Engineering Grant",
            "Merit",
            "Graduate",
            Some("Varies"),
        );
        varies.criteria = Some("Engineering".into());

        let need = scholarship(4, "Northern Need Bursary", "Need", "Graduate", Some("$5,000"));

        InMemoryScholarshipRepository::with_scholarships([engineering, small, varies, need])
    }

    fn ids(rows: &[Scholarship]) -> Vec<i64> {
        rows.iter().map(|s| s.id).collect()
    }

    #[tokio::test]
    async fn test_empty_filters_return_everything() {
        let service = ScholarshipService::new(catalogue());
        let rows = service.resolve(SearchFilters::default(), None).await.unwrap();
        assert_eq!(ids(&rows), vec![1, 2, 3, 4]);

        let rows = service
            .resolve(SearchFilters::default(), Some("   "))
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[tokio::test]
    async fn test_combined_filters_and_term() {
        let service = ScholarshipService::new(catalogue());
        let filters = SearchFilters {
            award_type: Some("Merit".into()),
            min_funds: Some("1000".into()),
            ..Default::default()
        };

        let rows = service.resolve(filters, Some("engineering")).await.unwrap();
        assert_eq!(ids(&rows), vec![1]);
    }

    #[tokio::test]
    async fn test_term_without_filters_matches_award_name_only() {
        let service = ScholarshipService::new(catalogue());
        let rows = service
            .resolve(SearchFilters::default(), Some("ENGINEERING"))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_term_with_filters_matches_all_fields() {
        let service = ScholarshipService::new(catalogue());
        let filters = SearchFilters {
            level_of_study: Some("Undergraduate".into()),
            ..Default::default()
        };
        let rows = service.resolve(filters, Some("Engineering")).await.unwrap();
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_max_funds_excludes_non_numeric() {
        let service = ScholarshipService::new(catalogue());
        let filters = SearchFilters {
            max_funds: Some("$1,000".into()),
            ..Default::default()
        };
        let rows = service.resolve(filters, None).await.unwrap();
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_bad_bound_is_validation_error() {
        let service = ScholarshipService::new(catalogue());
        let filters = SearchFilters {
            max_funds: Some("a lot".into()),
            ..Default::default()
        };
        let err = service.resolve(filters, None).await.unwrap_err();
        assert!(matches!(err, ScholarshipError::Validation(_)));
    }

    #[tokio::test]
    async fn test_no_match_is_empty_not_error() {
        let service = ScholarshipService::new(catalogue());
        let rows = service
            .list_scholarships(ListQuery {
                award_type: Some("Athletic".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_search_request_without_filters() {
        let service = ScholarshipService::new(catalogue());
        let rows = service
            .search_scholarships(SearchRequest {
                search_term: Some("bursary".into()),
                filters: None,
            })
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![4]);
    }

    #[tokio::test]
    async fn test_award_name_term_is_rechecked_literally() {
        let mut repo = MockScholarshipRepository::new();
        repo.expect_find().returning(|_| {
            Ok(vec![
                Scholarship::new(1, "A+ Award"),
                Scholarship::new(2, "A* Award"),
            ])
        });

        let service = ScholarshipService::new(repo);
        let rows = service
            .resolve(SearchFilters::default(), Some("a*"))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![2]);
    }

    #[tokio::test]
    async fn test_store_failure_reads_as_empty() {
        let mut repo = MockScholarshipRepository::new();
        repo.expect_find()
            .returning(|_| Err(ScholarshipError::Store("connection refused".into())));

        let service = ScholarshipService::new(repo);
        let rows = service.resolve(SearchFilters::default(), None).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_find_receives_pushed_down_filters() {
        let mut repo = MockScholarshipRepository::new();
        repo.expect_find()
            .withf(|query| {
                query.filters
                    == vec![
                        StoreFilter::LevelOfStudyContains("Graduate".into()),
                        StoreFilter::AwardTypeEquals("Need".into()),
                    ]
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = ScholarshipService::new(repo);
        let filters = SearchFilters {
            level_of_study: Some("Graduate".into()),
            award_type: Some("Need".into()),
            min_funds: Some("10".into()),
            max_funds: None,
        };
        service.resolve(filters, Some("north")).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_scholarship_not_found_and_store_failure() {
        let service = ScholarshipService::new(catalogue());
        assert_eq!(service.get_scholarship(4).await.unwrap().id, 4);
        assert!(matches!(
            service.get_scholarship(99).await,
            Err(ScholarshipError::NotFound(99))
        ));

        let mut repo = MockScholarshipRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(ScholarshipError::Store("timeout".into())));
        let service = ScholarshipService::new(repo);
        assert!(matches!(
            service.get_scholarship(1).await,
            Err(ScholarshipError::NotFound(1))
        ));
    }

    #[tokio::test]
    async fn test_vector_search_uses_embedding_matches() {
        let repo = catalogue();
        repo.set_embedding(4, vec![1.0, 0.0]).await;
        repo.set_embedding(1, vec![0.0, 1.0]).await;

        let mut provider = MockEmbeddingProvider::new();
        provider
            .expect_model()
            .return_const(EmbeddingModel::TextEmbeddingAda002);
        provider.expect_embed().times(1).returning(|_| {
            Ok(EmbeddingResult {
                values: vec![0.9, 0.1],
                tokens_used: 3,
            })
        });

        let service = ScholarshipService::new(repo).with_embedding_provider(Arc::new(provider));
        let rows = service.vector_search("need based support").await.unwrap();
        assert_eq!(ids(&rows), vec![4]);
        assert!(rows[0].similarity.is_some());
    }

    #[tokio::test]
    async fn test_vector_search_falls_back_on_provider_error() {
        let mut provider = MockEmbeddingProvider::new();
        provider
            .expect_embed()
            .returning(|_| Err(ScholarshipError::Embedding("503".into())));

        let service =
            ScholarshipService::new(catalogue()).with_embedding_provider(Arc::new(provider));

        // Matches focus, purpose and criteria as well as award names
        let rows = service.vector_search("engineering").await.unwrap();
        assert_eq!(ids(&rows), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_vector_fallback_matches_focus() {
        let mut prairie = Scholarship::new(1, "Prairie Award");
        prairie.focus = Some("Nursing".into());
        let service = ScholarshipService::new(InMemoryScholarshipRepository::with_scholarships([
            prairie,
        ]));

        let rows = service.vector_search("nursing").await.unwrap();
        assert_eq!(ids(&rows), vec![1]);

        // The plain resolver only looks at award names without filters
        let rows = service
            .resolve(SearchFilters::default(), Some("nursing"))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_vector_search_without_provider_falls_back() {
        let service = ScholarshipService::new(catalogue());
        let rows = service.vector_search("Bursary").await.unwrap();
        assert_eq!(ids(&rows), vec![4]);
    }

    #[tokio::test]
    async fn test_vector_search_falls_back_on_rpc_error() {
        let mut repo = MockScholarshipRepository::new();
        repo.expect_match_by_embedding()
            .withf(|params| {
                params.match_threshold == MATCH_THRESHOLD && params.match_count == MATCH_COUNT
            })
            .returning(|_| Err(ScholarshipError::Store("function not found".into())));
        repo.expect_find()
            .withf(|query| query.filters.is_empty())
            .times(1)
            .returning(|_| Ok(vec![Scholarship::new(8, "Nursing Bursary")]));

        let mut provider = MockEmbeddingProvider::new();
        provider
            .expect_model()
            .return_const(EmbeddingModel::TextEmbeddingAda002);
        provider.expect_embed().returning(|_| {
            Ok(EmbeddingResult {
                values: vec![0.1; 4],
                tokens_used: 1,
            })
        });

        let service = ScholarshipService::new(repo).with_embedding_provider(Arc::new(provider));
        let rows = service.vector_search("nursing").await.unwrap();
        assert_eq!(ids(&rows), vec![8]);
    }
}
