pub mod qdrant_config;
pub mod vector_db;

pub use vector_db::{IndexEntry, ScoredChunk, VectorDB, VectorDBError, VectorIndex};
