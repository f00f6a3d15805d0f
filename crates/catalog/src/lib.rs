//! Catalog layer: the read-only assessment catalog.
//!
//! Holds the data model and the loader for the crawler-produced JSON
//! snapshot. Insertion order is preserved and used as the stable
//! tie-break rank throughout the engine.

pub mod models;

pub use models::{Assessment, Domain};

use std::collections::HashMap;
use std::path::Path;

/// An immutable catalog snapshot. Built once from the crawled JSON
/// artifact, then shared read-only across recommendation calls.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<Assessment>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from in-memory records. Records without an `id`
    /// get their `url` as the stable identifier; duplicate ids keep the
    /// first occurrence.
    pub fn from_records(records: Vec<Assessment>) -> Self {
        let mut kept: Vec<Assessment> = Vec::with_capacity(records.len());
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(records.len());
        for mut rec in records {
            if rec.id.is_empty() {
                rec.id = rec.url.clone();
            }
            if by_id.contains_key(&rec.id) {
                tracing::warn!(id = %rec.id, "duplicate assessment id in catalog, keeping first");
                continue;
            }
            by_id.insert(rec.id.clone(), kept.len());
            kept.push(rec);
        }
        Self { records: kept, by_id }
    }

    /// Loads the catalog from a JSON array file written by the crawler.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read catalog {}: {}", path.display(), e))?;
        let records: Vec<Assessment> = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse catalog {}: {}", path.display(), e))?;
        let catalog = Self::from_records(records);
        tracing::info!(count = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Looks up an assessment by id, returning its insertion rank and record.
    pub fn get(&self, id: &str) -> Option<(usize, &Assessment)> {
        self.by_id.get(id).map(|&rank| (rank, &self.records[rank]))
    }

    pub fn records(&self) -> &[Assessment] {
        &self.records
    }

    /// Iterates records with their insertion ranks.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Assessment)> {
        self.records.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
