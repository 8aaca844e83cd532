use thiserror::Error;
use qdrant_client::{
    qdrant::{
        Distance, PointStruct, SearchPoints,
        VectorParams, Value,
        with_payload_selector::SelectorOptions, WithPayloadSelector,
        point_id::PointIdOptions,
        PointId,
        CreateCollection, VectorsConfig,
        UpsertPoints,
    },
    Qdrant,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::qdrant_config::create_qdrant_client;
use crate::document::Chunk;

#[derive(Error, Debug)]
pub enum VectorDBError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Operation failed: {0}")]
    Operation(String),
}

/// A chunk plus its embedding, ready to be written to the index.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity score, most similar first in any
/// result list.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
    pub metadata: HashMap<String, String>,
}

/// The vector index capability: batch upsert and k-NN query over a named
/// collection. Orchestration code only sees this trait so it can run
/// against an in-memory double in tests.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, collection: &str, entries: Vec<IndexEntry>) -> Result<(), VectorDBError>;

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<ScoredChunk>, VectorDBError>;
}

#[derive(Clone)]
pub struct VectorDB {
    client: Arc<Qdrant>,
}

impl VectorDB {
    pub async fn new(url: &str) -> Result<Self, VectorDBError> {
        let client = create_qdrant_client(url)
            .await
            .map_err(|e| VectorDBError::Connection(e.to_string()))?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub async fn create_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> Result<(), VectorDBError> {
        let vectors_config = VectorParams {
            size: vector_size,
            distance: Distance::Cosine.into(),
            ..Default::default()
        };

        let vectors_config = VectorsConfig {
            config: Some(qdrant_client::qdrant::vectors_config::Config::Params(vectors_config)),
        };

        let create_collection = CreateCollection {
            collection_name: name.to_string(),
            vectors_config: Some(vectors_config),
            ..Default::default()
        };

        match self.client.create_collection(create_collection).await {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("AlreadyExists") => {
                log::info!("Collection {} already exists, skipping creation", name);
                Ok(())
            }
            Err(e) => Err(VectorDBError::Operation(e.to_string())),
        }
    }
}

/// Deterministic point id for a chunk, so re-ingesting an unchanged corpus
/// overwrites points in place instead of accumulating duplicates.
fn point_id_for(chunk_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes()).to_string()
}

#[async_trait]
impl VectorIndex for VectorDB {
    async fn upsert(&self, collection: &str, entries: Vec<IndexEntry>) -> Result<(), VectorDBError> {
        let points: Vec<PointStruct> = entries
            .into_iter()
            .map(|entry| {
                let mut payload: HashMap<String, Value> = HashMap::new();
                payload.insert(
                    "text".to_string(),
                    Value::from(serde_json::Value::String(entry.chunk.text)),
                );
                payload.insert(
                    "metadata".to_string(),
                    Value::from(serde_json::json!(entry.chunk.metadata)),
                );

                PointStruct {
                    id: Some(PointId {
                        point_id_options: Some(PointIdOptions::Uuid(point_id_for(&entry.chunk.id))),
                    }),
                    vectors: Some(entry.embedding.into()),
                    payload,
                }
            })
            .collect();

        let upsert_points = UpsertPoints {
            collection_name: collection.to_string(),
            points,
            ..Default::default()
        };

        self.client
            .upsert_points(upsert_points)
            .await
            .map_err(|e| VectorDBError::Operation(e.to_string()))?;

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<ScoredChunk>, VectorDBError> {
        let request = SearchPoints {
            collection_name: collection.to_string(),
            vector,
            limit: top_k,
            with_payload: Some(WithPayloadSelector {
                selector_options: Some(SelectorOptions::Enable(true)),
            }),
            ..Default::default()
        };

        let results = self.client
            .search_points(request)
            .await
            .map_err(|e| VectorDBError::Operation(e.to_string()))?;

        let chunks = results.result
            .into_iter()
            .filter_map(|point| {
                let score = point.score;
                let payload: HashMap<String, serde_json::Value> = point.payload
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::try_from(v).unwrap_or(serde_json::Value::Null)))
                    .collect();

                let text = payload.get("text")?.as_str()?.to_string();
                let metadata = payload
                    .get("metadata")
                    .and_then(|m| serde_json::from_value(m.clone()).ok())
                    .unwrap_or_default();

                Some(ScoredChunk { text, score, metadata })
            })
            .collect();

        Ok(chunks)
    }
}
