use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

/// Maps text to a fixed-dimensional vector.
///
/// Queries and corpus chunks must go through the same implementation;
/// retrieval only works inside a single embedding space.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;
}

/// Local `all-MiniLM-L6-v2` sentence embedder (384 dimensions).
///
/// Deterministic for a fixed model version: the same input always yields
/// the same vector, which keeps re-ingestion idempotent. Inference is
/// synchronous ONNX work, so calls are shifted onto the blocking pool.
#[derive(Clone)]
pub struct MiniLmEmbedder {
    model: Arc<TextEmbedding>,
}

pub const MINILM_DIMENSION: usize = 384;

impl MiniLmEmbedder {
    pub fn new() -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(true),
        )
        .map_err(|e| anyhow!("Failed to load embedding model: {}", e))?;

        Ok(Self { model: Arc::new(model) })
    }
}

#[async_trait]
impl Embedder for MiniLmEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(vec![text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| anyhow!("Embedding model returned no vector"))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model.clone();
        let vectors = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| anyhow!("Embedding task panicked: {}", e))?
            .map_err(|e| anyhow!("Failed to generate embeddings: {}", e))?;

        for vector in &vectors {
            if vector.len() != MINILM_DIMENSION {
                return Err(anyhow!(
                    "Generated embedding has wrong size: {} (expected {})",
                    vector.len(),
                    MINILM_DIMENSION
                ));
            }
        }

        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        MINILM_DIMENSION
    }
}
