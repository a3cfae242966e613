//! # Object store
//!
//! The gateway talks to its bucket only through [`ObjectStore`]. The
//! S3-compatible implementation lives in the `s3` submodule, the in-memory
//! one in `memory`.

#[cfg(feature = "vendor-aws")]
pub mod s3;
pub mod memory;

#[cfg(feature = "vendor-aws")]
pub use s3::S3ObjectStore;
pub use memory::MemoryObjectStore;

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::GatewayError;

/// A request for a read-only, time-limited URL to one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedReadRequest {
    /// Credential name, unique per issuance (object name + issuance second)
    pub name: String,
    /// Object the URL grants read access to
    pub object_name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SignedReadRequest {
    /// Lifetime of the credential in whole seconds, at least 1.
    pub fn ttl_secs(&self) -> u32 {
        let secs = (self.expires_at - self.issued_at).num_seconds();
        secs.clamp(1, i64::from(u32::MAX)) as u32
    }
}

/// Abstract interface of the bucket.
///
/// Implementations must be safe to share between concurrent requests. No
/// call retries; a failure is reported once as [`GatewayError::Storage`].
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `body` under `name`, replacing any existing object.
    async fn put_object(&self, name: &str, body: Bytes) -> Result<(), GatewayError>;

    /// Names of every object in the bucket, in provider order.
    async fn list_objects(&self) -> Result<Vec<String>, GatewayError>;

    /// Deletes `name`. Whether a missing object is an error is up to the
    /// provider.
    async fn delete_object(&self, name: &str) -> Result<(), GatewayError>;

    /// Issues a pre-authenticated read URL for `request.object_name`.
    async fn issue_signed_read_url(
        &self,
        request: &SignedReadRequest,
    ) -> Result<String, GatewayError>;
}

/// Bounds a store call by `limit`. A timeout becomes a storage error.
pub async fn with_timeout<T, F>(limit: Duration, operation: &str, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    tokio::time::timeout(limit, call).await.map_err(|_| {
        GatewayError::Storage(format!(
            "{operation} timed out after {}s",
            limit.as_secs_f32()
        ))
    })?
}
