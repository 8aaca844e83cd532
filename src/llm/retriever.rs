use std::sync::Arc;

use anyhow::{Context, Result};

use crate::database::{ScoredChunk, VectorIndex};
use crate::embeddings::Embedder;

/// How many chunks ground each answer.
pub const TOP_K: u64 = 3;

/// Wraps the vector index with a fixed query policy: embed the question
/// with the same model used at ingestion, then take the k nearest chunks.
///
/// Failures (empty index, unreachable service) propagate to the caller;
/// there is no fallback answer at this layer.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    collection: String,
    top_k: u64,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, collection: impl Into<String>) -> Self {
        Self {
            embedder,
            index,
            collection: collection.into(),
            top_k: TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: u64) -> Self {
        self.top_k = top_k;
        self
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let query_vector = self.embedder
            .embed(query)
            .await
            .context("Failed to embed query")?;

        let results = self.index
            .query(&self.collection, query_vector, self.top_k)
            .await
            .context("Similarity search failed")?;

        Ok(results)
    }
}
