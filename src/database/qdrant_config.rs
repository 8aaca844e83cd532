use qdrant_client::{config::QdrantConfig, Qdrant};
use std::time::Duration;

/// Build a Qdrant client for `url` and probe the connection once.
///
/// Accepts URLs with or without a scheme. The REST port 6333 is rewritten
/// to 6334 because this client speaks gRPC.
pub async fn create_qdrant_client(url: &str) -> Result<Qdrant, Box<dyn std::error::Error + Send + Sync>> {
    let host = url.split("://").last().unwrap_or(url);
    let grpc_host = match host.strip_suffix(":6333") {
        Some(base) => format!("{}:6334", base),
        None => host.to_string(),
    };
    let endpoint = format!("http://{}", grpc_host);

    log::info!("Connecting to Qdrant at {}", endpoint);

    let mut config = QdrantConfig::from_url(&endpoint);
    config.check_compatibility = false;
    config.timeout = Duration::from_secs(30);
    config.connect_timeout = Duration::from_secs(10);

    let client = Qdrant::new(config)?;

    // Fail fast here rather than on the first upsert or search.
    if let Err(e) = client.list_collections().await {
        log::error!("Qdrant connection probe failed: {}", e);
        return Err(format!("Failed to connect to Qdrant at {}: {}", endpoint, e).into());
    }

    Ok(client)
}
