//! Scholarship-specific metrics.

use metrics::{counter, histogram};
use strum::{AsRefStr, Display};

/// Which matching strategy served a free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SearchStrategyLabel {
    /// No term supplied, constraints only
    Unfiltered,
    AwardName,
    AllFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum VectorSearchOutcome {
    Semantic,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    Duplicate,
    Rejected,
    Failed,
}

/// Scholarship metrics recorder
pub struct ScholarshipMetrics;

impl ScholarshipMetrics {
    pub fn record_search(strategy: SearchStrategyLabel, results: usize) {
        counter!(
            "scholarship_searches_total",
            "strategy" => strategy.as_ref().to_string()
        )
        .increment(1);

        histogram!(
            "scholarship_search_results",
            "strategy" => strategy.as_ref().to_string()
        )
        .record(results as f64);
    }

    pub fn record_vector_search(outcome: VectorSearchOutcome) {
        counter!(
            "scholarship_vector_searches_total",
            "outcome" => outcome.as_ref().to_string()
        )
        .increment(1);

        if outcome == VectorSearchOutcome::Fallback {
            tracing::debug!("Vector search served by keyword fallback");
        }
    }

    pub fn record_save(outcome: SaveOutcome) {
        counter!(
            "scholarship_saves_total",
            "outcome" => outcome.as_ref().to_string()
        )
        .increment(1);
    }

    /// A read against the store failed and was answered with no data
    pub fn record_store_read_failure(operation: &'static str) {
        counter!(
            "scholarship_store_read_failures_total",
            "operation" => operation
        )
        .increment(1);
    }
}
