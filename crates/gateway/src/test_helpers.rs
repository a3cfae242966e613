//! # Shared test helpers
//!
//! A scriptable [`ObjectStore`] whose signed URLs point at a throwaway axum
//! server, so handler tests exercise the real two-step fetch.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{ObjectStore, SignedReadRequest};

/// State shared between the mock store and its mock storage server.
#[derive(Default)]
pub struct MockShared {
    objects: Mutex<BTreeMap<String, (Bytes, Option<String>)>>,
    store_calls: AtomicUsize,
    fetches: AtomicUsize,
    fail_issuance: AtomicBool,
    fail_storage: AtomicBool,
    broken_urls: AtomicBool,
}

impl MockShared {
    pub fn names(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn body(&self, name: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(name).map(|(body, _)| body.clone())
    }

    /// Calls that reached the store (any operation).
    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    /// GETs that reached the mock storage server.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_storage(&self) -> Result<(), GatewayError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_storage.load(Ordering::SeqCst) {
            return Err(GatewayError::Storage(
                "BucketNotFound: produtos-fotos".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mock object store for tests.
pub struct MockObjectStore {
    shared: Arc<MockShared>,
    base_url: String,
}

impl MockObjectStore {
    /// Starts the mock storage server and returns a store pointing at it.
    pub async fn start() -> Self {
        let shared = Arc::new(MockShared::default());
        let port = start_mock_storage(shared.clone()).await;
        Self {
            shared,
            base_url: format!("http://127.0.0.1:{port}"),
        }
    }

    /// A store whose signed URLs point at a port nothing listens on.
    pub fn unreachable() -> Self {
        Self {
            shared: Arc::new(MockShared::default()),
            base_url: "http://127.0.0.1:9".to_string(),
        }
    }

    pub fn insert(&self, name: &str, body: &[u8], content_type: Option<&str>) {
        self.shared.objects.lock().unwrap().insert(
            name.to_string(),
            (Bytes::copy_from_slice(body), content_type.map(str::to_string)),
        );
    }

    /// Makes `issue_signed_read_url` fail.
    pub fn fail_issuance(&self) {
        self.shared.fail_issuance.store(true, Ordering::SeqCst);
    }

    /// Makes put, list and delete fail.
    pub fn fail_storage(&self) {
        self.shared.fail_storage.store(true, Ordering::SeqCst);
    }

    /// Makes the mock storage server answer 403 to every GET.
    pub fn break_signed_urls(&self) {
        self.shared.broken_urls.store(true, Ordering::SeqCst);
    }

    pub fn shared(&self) -> Arc<MockShared> {
        self.shared.clone()
    }

    pub fn into_state(self, timeout: Duration) -> GatewayState {
        GatewayState::new(Box::new(self), timeout).unwrap()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(&self, name: &str, body: Bytes) -> Result<(), GatewayError> {
        self.shared.check_storage()?;
        self.shared
            .objects
            .lock()
            .unwrap()
            .insert(name.to_string(), (body, None));
        Ok(())
    }

    async fn list_objects(&self) -> Result<Vec<String>, GatewayError> {
        self.shared.check_storage()?;
        Ok(self.shared.names())
    }

    async fn delete_object(&self, name: &str) -> Result<(), GatewayError> {
        self.shared.check_storage()?;
        match self.shared.objects.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(GatewayError::Storage(format!("ObjectNotFound: {name}"))),
        }
    }

    async fn issue_signed_read_url(
        &self,
        request: &SignedReadRequest,
    ) -> Result<String, GatewayError> {
        self.shared.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_issuance.load(Ordering::SeqCst) {
            return Err(GatewayError::Storage("NotAuthorizedOrNotFound".to_string()));
        }
        Ok(format!(
            "{}/objects/{}?sig=test&exp={}",
            self.base_url,
            utf8_percent_encode(&request.object_name, NON_ALPHANUMERIC),
            request.expires_at.timestamp()
        ))
    }
}

/// Starts a mock storage server on an ephemeral port serving the objects of
/// `shared` under `/objects/{name}`.
pub async fn start_mock_storage(shared: Arc<MockShared>) -> u16 {
    let app = axum::Router::new()
        .route("/objects/{name}", axum::routing::get(serve_object))
        .with_state(shared);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    port
}

async fn serve_object(State(shared): State<Arc<MockShared>>, Path(name): Path<String>) -> Response {
    shared.fetches.fetch_add(1, Ordering::SeqCst);
    if shared.broken_urls.load(Ordering::SeqCst) {
        return (StatusCode::FORBIDDEN, "signature expired").into_response();
    }

    let object = shared.objects.lock().unwrap().get(&name).cloned();
    match object {
        Some((body, Some(content_type))) => {
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Some((body, None)) => {
            let mut response = body.into_response();
            response.headers_mut().remove(header::CONTENT_TYPE);
            response
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
