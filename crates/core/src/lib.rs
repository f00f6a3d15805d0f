//! Core library: domain classification, vector retrieval, and the
//! fetch-then-rank recommendation engine.

pub mod classifier;
pub mod config;
pub mod embeddings;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexer;
pub mod pipeline;

pub use engine::{Recommendation, RecommendationResult, Recommender};
pub use error::RecommendError;
