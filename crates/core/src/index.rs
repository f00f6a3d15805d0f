//! Vector-index abstraction consumed by the engine.
//!
//! Implementations must return results in descending score order with
//! ties broken by catalog insertion order, and be deterministic for a
//! fixed snapshot and query vector.

use catalog::Domain;
use providers::qdrant::QdrantClient;
use providers::ProviderError;

/// One search hit: an assessment id with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
}

#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest-neighbor search, optionally restricted to points tagged
    /// with `domain`. Returns at most `top_k` hits.
    async fn search(
        &self,
        vector: &[f32],
        domain: Option<Domain>,
        top_k: usize,
    ) -> Result<Vec<ScoredPoint>, ProviderError>;
}

/// Qdrant-backed index. The domain filter matches the `domains` keyword
/// array written by the indexer.
pub struct QdrantIndex {
    client: QdrantClient,
}

impl QdrantIndex {
    pub fn new(client: QdrantClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &QdrantClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(
        &self,
        vector: &[f32],
        domain: Option<Domain>,
        top_k: usize,
    ) -> Result<Vec<ScoredPoint>, ProviderError> {
        let filter = domain.map(|d| {
            serde_json::json!({
                "must": [{ "key": "domains", "match": { "value": d.code().to_string() } }]
            })
        });
        let resp = self
            .client
            .search(vector.to_vec(), top_k as u64, filter)
            .await?;
        Ok(resp
            .result
            .into_iter()
            .map(|r| ScoredPoint {
                id: match r.id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
                score: r.score,
            })
            .collect())
    }
}

/// In-process cosine-similarity index over the full catalog. Serves as
/// the zero-infrastructure local store and the test double. Points are
/// held in catalog insertion order, which makes tie-breaking stable.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    points: Vec<MemPoint>,
}

#[derive(Debug)]
struct MemPoint {
    id: String,
    domains: Vec<Domain>,
    vector: Vec<f32>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, domains: Vec<Domain>, vector: Vec<f32>) {
        self.points.push(MemPoint {
            id: id.into(),
            domains,
            vector,
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[async_trait::async_trait]
impl VectorIndex for MemoryIndex {
    async fn search(
        &self,
        vector: &[f32],
        domain: Option<Domain>,
        top_k: usize,
    ) -> Result<Vec<ScoredPoint>, ProviderError> {
        let mut hits: Vec<ScoredPoint> = self
            .points
            .iter()
            .filter(|p| domain.map_or(true, |d| p.domains.contains(&d)))
            .map(|p| ScoredPoint {
                id: p.id.clone(),
                score: cosine(vector, &p.vector),
            })
            .collect();
        // Stable sort keeps insertion order for equal scores.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}
