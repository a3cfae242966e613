//! # In-memory object store
//!
//! Keeps objects in a process-local map. Signed read URLs point at a small
//! loopback HTTP listener owned by the store, so the gateway's fetch path
//! (issue URL, then GET it) runs exactly as it does against a real provider.
//!
//! Each token is bound to one object and stops working at its expiry.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::{ObjectStore, SignedReadRequest};
use crate::error::GatewayError;

struct StoredObject {
    body: Bytes,
    content_type: String,
}

struct SignedGrant {
    object_name: String,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    /// Sorted by name, like an S3 listing
    objects: RwLock<BTreeMap<String, StoredObject>>,
    grants: RwLock<HashMap<String, SignedGrant>>,
}

/// Object store held in memory.
pub struct MemoryObjectStore {
    inner: Arc<Inner>,
    base_url: String,
    server: JoinHandle<()>,
}

impl MemoryObjectStore {
    /// Starts the signed-URL listener on an ephemeral loopback port.
    pub async fn spawn() -> anyhow::Result<Self> {
        let inner = Arc::new(Inner::default());

        let app = axum::Router::new()
            .route("/signed/{token}", axum::routing::get(serve_signed))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "in-memory signed URL listener stopped");
            }
        });

        tracing::info!(base_url = %base_url, "in-memory object store started");

        Ok(Self {
            inner,
            base_url,
            server,
        })
    }

    /// Number of signed URLs that have not expired yet.
    #[cfg(test)]
    pub async fn live_grants(&self) -> usize {
        let now = Utc::now();
        self.inner
            .grants
            .read()
            .await
            .values()
            .filter(|grant| grant.expires_at > now)
            .count()
    }
}

impl Drop for MemoryObjectStore {
    fn drop(&mut self) {
        self.server.abort();
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, name: &str, body: Bytes) -> Result<(), GatewayError> {
        let content_type = mime_guess::from_path(name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        self.inner
            .objects
            .write()
            .await
            .insert(name.to_string(), StoredObject { body, content_type });
        Ok(())
    }

    async fn list_objects(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.inner.objects.read().await.keys().cloned().collect())
    }

    async fn delete_object(&self, name: &str) -> Result<(), GatewayError> {
        match self.inner.objects.write().await.remove(name) {
            Some(_) => Ok(()),
            None => Err(GatewayError::Storage(format!("object not found: {name}"))),
        }
    }

    async fn issue_signed_read_url(
        &self,
        request: &SignedReadRequest,
    ) -> Result<String, GatewayError> {
        if !self
            .inner
            .objects
            .read()
            .await
            .contains_key(&request.object_name)
        {
            return Err(GatewayError::Storage(format!(
                "object not found: {}",
                request.object_name
            )));
        }

        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();

        let mut grants = self.inner.grants.write().await;
        grants.retain(|_, grant| grant.expires_at > now);
        grants.insert(
            token.clone(),
            SignedGrant {
                object_name: request.object_name.clone(),
                expires_at: request.expires_at,
            },
        );

        tracing::debug!(credential = %request.name, token = %token, "issued in-memory signed URL");

        Ok(format!("{}/signed/{token}", self.base_url))
    }
}

/// GET /signed/{token}
async fn serve_signed(State(inner): State<Arc<Inner>>, Path(token): Path<String>) -> Response {
    let object_name = {
        let grants = inner.grants.read().await;
        match grants.get(&token) {
            Some(grant) if grant.expires_at > Utc::now() => grant.object_name.clone(),
            _ => return (StatusCode::FORBIDDEN, "invalid or expired signature").into_response(),
        }
    };

    let objects = inner.objects.read().await;
    match objects.get(&object_name) {
        Some(object) => (
            [(header::CONTENT_TYPE, object.content_type.clone())],
            object.body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "object not found").into_response(),
    }
}
