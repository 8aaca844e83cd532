mod chunker;
mod loader;

pub use chunker::TextSplitter;
pub use loader::load_pdf_dir;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw extracted text for a single PDF page plus its source metadata.
///
/// Documents are produced once by ingestion and only ever consumed by the
/// splitter; they are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: HashMap::new(),
        }
    }
}

/// A bounded-length fragment of a [`Document`], the unit of retrieval.
///
/// Metadata is inherited from the parent document plus a `chunk_index`
/// field. The id is `{document_id}_{chunk_index}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub metadata: HashMap<String, String>,
}
