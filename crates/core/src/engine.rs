//! Fetch-then-rank recommendation engine.
//!
//! One `recommend` call: classify the query into domains, fetch an
//! over-broad candidate pool per domain, merge the pools, enforce
//! minimum per-domain representation, and order the final list by
//! relevance. Stateless across calls; the catalog and index handles are
//! shared read-only.

use crate::classifier::{self, QueryIntent};
use crate::embeddings;
use crate::error::RecommendError;
use crate::index::VectorIndex;
use catalog::{Assessment, Catalog, Domain};
use providers::ProviderRegistry;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

pub const MIN_RESULTS: usize = 5;
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Desired result size; clamped to `[MIN_RESULTS, MAX_RESULTS]`.
    pub target_size: usize,
    /// Over-fetch multiplier applied to index queries so the balance
    /// phase has room to filter.
    pub overfetch: usize,
    /// Registry keys; `None` uses the preferred providers.
    pub classifier_provider: Option<String>,
    pub embedding_provider: Option<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            target_size: MAX_RESULTS,
            overfetch: 3,
            classifier_provider: None,
            embedding_provider: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub assessment: Assessment,
    #[serde(skip)]
    pub score: f32,
    /// Intent pools that surfaced this candidate (empty for broad
    /// fetches).
    #[serde(skip)]
    pub sources: BTreeSet<Domain>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationResult {
    /// Domains the classifier attributed to the query; empty means the
    /// list is a pure relevance ranking.
    pub intent: QueryIntent,
    pub items: Vec<Recommendation>,
}

/// A deduplicated search hit, keyed by catalog rank.
struct Candidate {
    rank: usize,
    score: f32,
    sources: BTreeSet<Domain>,
}

pub struct Recommender {
    catalog: Arc<Catalog>,
    index: Arc<dyn VectorIndex>,
    registry: ProviderRegistry,
    opts: EngineOptions,
}

impl Recommender {
    pub fn new(
        catalog: Arc<Catalog>,
        index: Arc<dyn VectorIndex>,
        registry: ProviderRegistry,
        opts: EngineOptions,
    ) -> Self {
        Self {
            catalog,
            index,
            registry,
            opts,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The sole entry point. Returns a ranked, balanced list of 5-10
    /// assessments, or fewer when the catalog itself has fewer matches.
    pub async fn recommend(&self, query: &str) -> Result<RecommendationResult, RecommendError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RecommendError::InvalidQuery(
                "query is empty after trimming".into(),
            ));
        }

        let intent = classifier::classify(
            query,
            &self.registry,
            self.opts.classifier_provider.as_deref(),
        )
        .await;

        let vector = embeddings::embed_query(
            query,
            &self.registry,
            self.opts.embedding_provider.as_deref(),
        )
        .await
        .map_err(RecommendError::Embedding)?;

        let target = self.opts.target_size.clamp(MIN_RESULTS, MAX_RESULTS);
        let overfetch = self.opts.overfetch.max(1);
        let quota = per_domain_quota(target, intent.len());

        // Fetch phase: one broad pool, or one pool per intent domain.
        let mut pools: Vec<(Option<Domain>, Vec<crate::index::ScoredPoint>)> = Vec::new();
        if intent.is_empty() {
            let hits = self
                .index
                .search(&vector, None, target * overfetch)
                .await
                .map_err(RecommendError::IndexUnavailable)?;
            pools.push((None, hits));
        } else {
            for &domain in &intent {
                let hits = self
                    .index
                    .search(&vector, Some(domain), quota * overfetch)
                    .await
                    .map_err(RecommendError::IndexUnavailable)?;
                pools.push((Some(domain), hits));
            }
        }

        // Merge phase: dedupe by id, keep the best score, remember every
        // pool that surfaced the candidate.
        let mut merged: HashMap<usize, Candidate> = HashMap::new();
        for (source, hits) in pools {
            for hit in hits {
                let Some((rank, _)) = self.catalog.get(&hit.id) else {
                    tracing::warn!(id = %hit.id, "search hit missing from catalog snapshot, dropped");
                    continue;
                };
                let entry = merged.entry(rank).or_insert_with(|| Candidate {
                    rank,
                    score: hit.score,
                    sources: BTreeSet::new(),
                });
                if hit.score > entry.score {
                    entry.score = hit.score;
                }
                if let Some(d) = source {
                    entry.sources.insert(d);
                }
            }
        }

        let mut candidates: Vec<Candidate> = merged.into_values().collect();
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.rank.cmp(&b.rank)));

        if candidates.len() < MIN_RESULTS {
            tracing::warn!(
                available = candidates.len(),
                target,
                "insufficient candidates, returning all available"
            );
        }

        let mut selected = self.balance(&candidates, &intent, target, quota);

        // Order phase: balance decided membership, relevance decides
        // order. Sorting the picked indices restores (score desc, rank
        // asc) because `candidates` is already in that order.
        selected.sort_unstable();
        let items: Vec<Recommendation> = selected
            .into_iter()
            .map(|i| {
                let cand = &candidates[i];
                Recommendation {
                    assessment: self.catalog.records()[cand.rank].clone(),
                    score: cand.score,
                    sources: cand.sources.clone(),
                }
            })
            .collect();

        Ok(RecommendationResult { intent, items })
    }

    /// Balance phase; returns indices into the relevance-sorted
    /// candidate slice.
    ///
    /// Round one hands every intent domain its single best candidate so
    /// representation is guaranteed whenever the catalog has any match.
    /// Round two tops each domain up to its quota. Remaining slots are
    /// backfilled by pure relevance regardless of domain. A candidate's
    /// own primary domain decides its partition, not the pool that
    /// fetched it.
    fn balance(
        &self,
        candidates: &[Candidate],
        intent: &QueryIntent,
        target: usize,
        quota: usize,
    ) -> Vec<usize> {
        let mut selected: Vec<usize> = Vec::with_capacity(target);
        let mut taken: HashSet<usize> = HashSet::new();
        let primary = |c: &Candidate| self.catalog.records()[c.rank].primary_domain();

        if !intent.is_empty() {
            for &domain in intent.iter() {
                if selected.len() >= target {
                    break;
                }
                if let Some(i) = (0..candidates.len())
                    .find(|i| !taken.contains(i) && primary(&candidates[*i]) == Some(domain))
                {
                    taken.insert(i);
                    selected.push(i);
                }
            }

            for &domain in intent.iter() {
                let mut count = selected
                    .iter()
                    .filter(|&&i| primary(&candidates[i]) == Some(domain))
                    .count();
                for i in 0..candidates.len() {
                    if count >= quota || selected.len() >= target {
                        break;
                    }
                    if !taken.contains(&i) && primary(&candidates[i]) == Some(domain) {
                        taken.insert(i);
                        selected.push(i);
                        count += 1;
                    }
                }
            }
        }

        // Backfill from the global pool by relevance.
        for i in 0..candidates.len() {
            if selected.len() >= target {
                break;
            }
            if taken.insert(i) {
                selected.push(i);
            }
        }

        selected
    }
}

/// `ceil(target / domains)`, never below one.
fn per_domain_quota(target: usize, domains: usize) -> usize {
    if domains == 0 {
        return target;
    }
    ((target + domains - 1) / domains).max(1)
}
