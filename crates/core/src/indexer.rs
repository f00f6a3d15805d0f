//! Builds the vector index from a catalog snapshot: composes one
//! embedding document per assessment, batch-embeds, and upserts.

use crate::embeddings::{embed, EmbeddingRequest};
use crate::index::MemoryIndex;
use catalog::{Assessment, Catalog};
use providers::qdrant::{QdrantClient, QdrantPoint};
use providers::{ProviderError, ProviderRegistry};
use std::collections::{HashMap, HashSet};

/// The text embedded for one assessment. Mirrors the document shape the
/// index was originally built with, so query and document vectors live
/// in the same space.
pub fn document_text(assessment: &Assessment) -> String {
    let types: Vec<&str> = assessment.test_type.iter().map(|d| d.name()).collect();
    format!(
        "Name: {}\nType: {}\nDescription: {}",
        assessment.name,
        types.join(", "),
        assessment.description
    )
}

/// Embeds the whole catalog into an in-process index. Insertion follows
/// catalog order so tie-breaks stay stable.
pub async fn build_memory_index(
    catalog: &Catalog,
    registry: &ProviderRegistry,
    batch_size: usize,
) -> Result<MemoryIndex, ProviderError> {
    let batch_size = batch_size.max(1);
    let mut index = MemoryIndex::new();
    let records = catalog.records();
    for batch in records.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(document_text).collect();
        let result = embed(
            EmbeddingRequest {
                texts,
                provider: None,
            },
            registry,
        )
        .await?;
        for (record, vector) in batch.iter().zip(result.vectors.into_iter()) {
            index.insert(record.id.clone(), record.test_type.clone(), vector);
        }
    }
    tracing::info!(points = index.len(), "memory index built");
    Ok(index)
}

/// Embeds catalog records into a Qdrant collection, skipping ids that
/// are already present.
pub async fn index_into_qdrant(
    catalog: &Catalog,
    registry: &ProviderRegistry,
    client: &QdrantClient,
    batch_size: usize,
) -> Result<usize, ProviderError> {
    let batch_size = batch_size.max(1);

    let mut present: HashSet<String> = HashSet::new();
    let ids: Vec<String> = catalog.records().iter().map(|r| r.id.clone()).collect();
    for batch_ids in ids.chunks(256) {
        if let Ok(resp) = client.retrieve(batch_ids.to_vec()).await {
            for p in resp.result {
                present.insert(p.id);
            }
        }
    }

    let pending: Vec<(usize, &Assessment)> = catalog
        .iter()
        .filter(|(_, r)| !present.contains(&r.id))
        .collect();
    if pending.is_empty() {
        tracing::info!("all catalog records already indexed");
        return Ok(0);
    }

    let mut indexed = 0usize;
    for batch in pending.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|(_, r)| document_text(r)).collect();
        let result = embed(
            EmbeddingRequest {
                texts,
                provider: None,
            },
            registry,
        )
        .await?;

        let points: Vec<QdrantPoint> = batch
            .iter()
            .zip(result.vectors.into_iter())
            .map(|((rank, record), vector)| {
                let mut payload: HashMap<String, serde_json::Value> = HashMap::new();
                payload.insert("name".into(), serde_json::json!(record.name));
                payload.insert("url".into(), serde_json::json!(record.url));
                payload.insert(
                    "domains".into(),
                    serde_json::json!(record
                        .test_type
                        .iter()
                        .map(|d| d.code().to_string())
                        .collect::<Vec<_>>()),
                );
                payload.insert("rank".into(), serde_json::json!(rank));
                QdrantPoint {
                    id: record.id.clone(),
                    vector,
                    payload,
                }
            })
            .collect();

        client.upsert(points).await?;
        indexed += batch.len();
        tracing::debug!(indexed, "indexer batch upserted");
    }

    tracing::info!(indexed, skipped = present.len(), "qdrant index updated");
    Ok(indexed)
}
