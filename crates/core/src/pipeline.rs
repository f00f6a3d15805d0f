//! Bootstrap helpers: wire config, providers, catalog, and index into a
//! ready [`Recommender`].

use crate::config::AppConfig;
use crate::engine::{EngineOptions, Recommender};
use crate::index::{QdrantIndex, VectorIndex};
use crate::indexer;
use anyhow::Context;
use catalog::Catalog;
use providers::gemini::{GeminiConfig, GeminiProvider};
use providers::noop::NoopProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::qdrant::{QdrantClient, QdrantConfig};
use providers::ProviderRegistry;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new()
        .with_embedding("noop", Arc::new(NoopProvider))
        .with_llm("noop", Arc::new(NoopProvider));

    if let Some(key) = std::env::var_os("OPENAI_API_KEY") {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: key.to_string_lossy().into_owned(),
            base_url,
            embedding_model: config.embeddings.model.clone(),
            chat_model: config.classifier.model.clone(),
        });
        reg = reg
            .with_embedding("openai", Arc::new(provider.clone()))
            .with_llm("openai", Arc::new(provider));
    }

    if let Some(key) = std::env::var_os("GEMINI_API_KEY") {
        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let provider = GeminiProvider::new(GeminiConfig {
            api_key: key.to_string_lossy().into_owned(),
            base_url,
            model: config.classifier.model.clone(),
        });
        reg = reg.with_llm("gemini", Arc::new(provider));
    }

    reg.set_preferred_embedding(&config.embeddings.provider)
        .set_preferred_llm(&config.classifier.provider)
}

pub fn build_qdrant(config: &AppConfig) -> anyhow::Result<QdrantClient> {
    let url = config
        .vectors
        .url
        .clone()
        .context("vectors.url is required for the qdrant provider")?;
    Ok(QdrantClient::new(QdrantConfig {
        url,
        collection: config.vectors.collection.clone(),
        api_key: std::env::var("QDRANT_API_KEY").ok(),
    }))
}

/// Loads the catalog, builds or connects the vector index per
/// `vectors.provider`, and assembles the engine.
pub async fn build_engine(config: &AppConfig) -> anyhow::Result<Recommender> {
    let catalog =
        Arc::new(Catalog::load(Path::new(&config.catalog.path)).context("load catalog")?);
    let registry = build_registry(config);

    let index: Arc<dyn VectorIndex> = match config.vectors.provider.as_str() {
        "qdrant" => Arc::new(QdrantIndex::new(build_qdrant(config)?)),
        "memory" => {
            info!("building in-memory index from catalog");
            let index =
                indexer::build_memory_index(&catalog, &registry, config.embeddings.batch_size)
                    .await
                    .context("build in-memory index")?;
            Arc::new(index)
        }
        other => anyhow::bail!("unknown vector index provider: {other}"),
    };

    Ok(Recommender::new(
        catalog,
        index,
        registry,
        EngineOptions {
            target_size: config.recommend.target_size,
            overfetch: config.recommend.overfetch,
            classifier_provider: None,
            embedding_provider: None,
        },
    ))
}

/// Runs the catalog indexer against the configured vector store.
/// Returns the number of newly indexed assessments.
pub async fn run_indexer(config: &AppConfig) -> anyhow::Result<usize> {
    let catalog = Catalog::load(Path::new(&config.catalog.path)).context("load catalog")?;
    let registry = build_registry(config);

    match config.vectors.provider.as_str() {
        "qdrant" => {
            let client = build_qdrant(config)?;
            let indexed =
                indexer::index_into_qdrant(&catalog, &registry, &client, config.embeddings.batch_size)
                    .await
                    .context("index into qdrant")?;
            Ok(indexed)
        }
        "memory" => {
            info!("memory index is built at startup, nothing to persist");
            Ok(0)
        }
        other => anyhow::bail!("unknown vector index provider: {other}"),
    }
}
