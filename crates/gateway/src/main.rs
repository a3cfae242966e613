//! # Galeria Gateway
//!
//! HTTP gateway in front of a single object-storage bucket.
//!
//! ## Role
//! - Accept uploads and write them to the bucket
//! - List and delete bucket objects
//! - Serve objects inline or as downloads through freshly issued signed URLs
//!
//! ## API endpoints
//! - `GET /`: landing page
//! - `POST /enviar`: upload (multipart field `arquivo`)
//! - `GET /obter-objetos`: listing
//! - `DELETE /excluir/{nome}`: delete
//! - `GET /image/{nome}`: inline serve with a guessed image type
//! - `GET /download/{nome}`: attachment download

mod config;
mod content_type;
mod endpoints;
mod error;
mod fetch;
mod router;
mod signed_url;
mod storage;
#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState, StorageBackend};
use storage::{MemoryObjectStore, ObjectStore};

#[cfg(feature = "vendor-aws")]
fn s3_store(config: &GatewayConfig) -> anyhow::Result<Box<dyn ObjectStore>> {
    Ok(Box::new(storage::S3ObjectStore::from_settings(&config.s3)?))
}

#[cfg(not(feature = "vendor-aws"))]
fn s3_store(_config: &GatewayConfig) -> anyhow::Result<Box<dyn ObjectStore>> {
    anyhow::bail!("STORAGE_BACKEND=s3 requires the vendor-aws feature")
}

/// Builds the configured object store.
async fn build_store(config: &GatewayConfig) -> anyhow::Result<Box<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::S3 => s3_store(config),
        StorageBackend::Memory => {
            tracing::warn!("STORAGE_BACKEND=memory: objects are lost on restart");
            Ok(Box::new(MemoryObjectStore::spawn().await?))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let store = build_store(&config).await?;
    let state = Arc::new(GatewayState::new(store, config.upstream_timeout)?);

    let app = router::build_router(state, config.max_upload_bytes);

    tracing::info!(
        addr = %config.listen_addr,
        backend = ?config.backend,
        "starting gateway"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
