use async_trait::async_trait;

use crate::error::ScholarshipResult;
use crate::models::{EmbeddingModel, EmbeddingResult};

/// Trait for embedding generation providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model the provider embeds with
    fn model(&self) -> EmbeddingModel;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> ScholarshipResult<EmbeddingResult>;
}
