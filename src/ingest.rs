use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::database::{IndexEntry, VectorIndex};
use crate::document::{Document, TextSplitter};
use crate::embeddings::Embedder;

/// Chunk every document, embed all chunks, and write them to the index in
/// one batch. Returns the number of points written.
///
/// Not transactional: a crash between embed and upsert, or mid-upsert,
/// leaves the collection partially populated. Re-running the job is the
/// recovery path; point ids are deterministic, so a rerun overwrites
/// rather than duplicates.
pub async fn ingest_documents(
    documents: &[Document],
    splitter: &TextSplitter,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    collection: &str,
) -> Result<usize> {
    let chunks: Vec<_> = documents
        .iter()
        .flat_map(|document| splitter.split_document(document))
        .collect();

    if chunks.is_empty() {
        return Err(anyhow!("Extracted no text chunks; nothing to ingest"));
    }

    log::info!(
        "Embedding {} chunks from {} documents",
        chunks.len(),
        documents.len()
    );

    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap());
    progress.set_message(format!("Embedding {} chunks", chunks.len()));

    let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
    let embeddings = embedder
        .embed_batch(texts)
        .await
        .context("Failed to embed chunks")?;

    progress.set_message("Writing to vector index");

    let entries: Vec<IndexEntry> = chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
        .collect();
    let count = entries.len();

    index
        .upsert(collection, entries)
        .await
        .with_context(|| format!("Failed to upsert into collection '{}'", collection))?;

    progress.finish_with_message(format!("Indexed {} chunks", count));
    log::info!("Upserted {} points into '{}'", count, collection);

    Ok(count)
}
