#![allow(dead_code)]

use catalog::{Assessment, Catalog, Domain};
use providers::{EmbedResponse, EmbeddingProvider, LlmProvider, ProviderError, ProviderRegistry};
use recommender_core::engine::{EngineOptions, Recommender};
use recommender_core::index::MemoryIndex;
use std::collections::HashMap;
use std::sync::Arc;

/// Deterministic embedding stub: maps known texts to fixed vectors,
/// everything else to a neutral default.
pub struct MapEmbedding {
    pub map: HashMap<String, Vec<f32>>,
    pub default: Vec<f32>,
}

impl MapEmbedding {
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            map: HashMap::new(),
            default,
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.map.insert(text.to_string(), vector);
        self
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MapEmbedding {
    async fn embed(&self, texts: &[String]) -> Result<EmbedResponse, ProviderError> {
        Ok(EmbedResponse {
            vectors: texts
                .iter()
                .map(|t| self.map.get(t).cloned().unwrap_or_else(|| self.default.clone()))
                .collect(),
        })
    }
}

/// LLM stub: replies with a fixed string, or errors when `reply` is
/// `None`.
pub struct StubLlm {
    pub reply: Option<String>,
}

impl StubLlm {
    pub fn replies(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait::async_trait]
impl LlmProvider for StubLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.reply
            .clone()
            .ok_or_else(|| ProviderError::RequestFailed("stub llm down".into()))
    }
}

pub fn registry(embedding: MapEmbedding, llm: StubLlm) -> ProviderRegistry {
    ProviderRegistry::new()
        .with_embedding("stub", Arc::new(embedding))
        .with_llm("stub", Arc::new(llm))
        .set_preferred_embedding("stub")
        .set_preferred_llm("stub")
}

pub fn assessment(id: &str, name: &str, domains: &[Domain]) -> Assessment {
    Assessment {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("https://example.com/assessments/{id}"),
        description: format!("{name} assessment"),
        duration: Some(30),
        test_type: domains.to_vec(),
        remote_support: true,
        adaptive_support: false,
    }
}

/// Builds a catalog and a matching memory index from (record, vector)
/// pairs, preserving insertion order.
pub fn catalog_and_index(entries: Vec<(Assessment, Vec<f32>)>) -> (Catalog, MemoryIndex) {
    let mut index = MemoryIndex::new();
    let mut records = Vec::with_capacity(entries.len());
    for (record, vector) in entries {
        index.insert(record.id.clone(), record.test_type.clone(), vector);
        records.push(record);
    }
    (Catalog::from_records(records), index)
}

pub fn engine(
    catalog: Catalog,
    index: MemoryIndex,
    registry: ProviderRegistry,
    target_size: usize,
) -> Recommender {
    Recommender::new(
        Arc::new(catalog),
        Arc::new(index),
        registry,
        EngineOptions {
            target_size,
            overfetch: 3,
            classifier_provider: None,
            embedding_provider: None,
        },
    )
}
