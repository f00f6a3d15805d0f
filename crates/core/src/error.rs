use providers::ProviderError;
use thiserror::Error;

/// Failures surfaced by [`crate::engine::Recommender::recommend`].
///
/// Classifier failure is deliberately absent: the engine absorbs it via
/// the keyword fallback and only logs the degradation.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("query embedding failed: {0}")]
    Embedding(#[source] ProviderError),
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(#[source] ProviderError),
}
