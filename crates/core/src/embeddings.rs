use providers::{ProviderError, ProviderRegistry};

#[derive(Debug, Clone)]
pub struct EmbeddingRequest {
    pub texts: Vec<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    pub vectors: Vec<Vec<f32>>,
}

pub async fn embed(
    req: EmbeddingRequest,
    registry: &ProviderRegistry,
) -> Result<EmbeddingResult, ProviderError> {
    let provider = registry.embedding(req.provider.as_deref())?;
    let resp = provider.embed(&req.texts).await?;
    Ok(EmbeddingResult {
        vectors: resp.vectors,
    })
}

/// Embeds a single query string. The same provider must have built the
/// index for scores to be comparable.
pub async fn embed_query(
    query: &str,
    registry: &ProviderRegistry,
    provider: Option<&str>,
) -> Result<Vec<f32>, ProviderError> {
    let result = embed(
        EmbeddingRequest {
            texts: vec![query.to_string()],
            provider: provider.map(str::to_string),
        },
        registry,
    )
    .await?;
    result
        .vectors
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::RequestFailed("embedding provider returned no vector".into()))
}
