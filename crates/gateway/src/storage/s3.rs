//! # S3-compatible object store
//!
//! Object store backed by any S3-compatible API (AWS S3, MinIO, Cloudflare
//! R2, ...). Signed read URLs are SigV4 presigned GETs.

use bytes::Bytes;

use super::{ObjectStore, SignedReadRequest};
use crate::config::S3Settings;
use crate::error::GatewayError;

/// Object store over one S3 bucket.
pub struct S3ObjectStore {
    bucket: s3::Bucket,
}

impl S3ObjectStore {
    pub fn new(bucket: s3::Bucket) -> Self {
        Self { bucket }
    }

    /// Builds the bucket handle from the configured endpoint and credentials.
    pub fn from_settings(settings: &S3Settings) -> anyhow::Result<Self> {
        let region = s3::Region::Custom {
            region: settings
                .region
                .clone()
                .unwrap_or_else(|| detect_region(&settings.endpoint)),
            endpoint: settings.endpoint.clone(),
        };

        let credentials = s3::creds::Credentials::new(
            Some(settings.access_key.as_str()),
            Some(settings.secret_key.as_str()),
            None,
            None,
            None,
        )?;

        let bucket = s3::Bucket::new(&settings.bucket, region, credentials)?.with_path_style();

        tracing::info!(
            endpoint = %settings.endpoint,
            bucket = %settings.bucket,
            "S3 object store configured"
        );

        Ok(Self::new(*bucket))
    }
}

/// Region of an AWS endpoint (`s3.REGION.amazonaws.com`), `us-east-1` for
/// anything else.
fn detect_region(endpoint: &str) -> String {
    endpoint
        .find("s3.")
        .and_then(|start| {
            let rest = &endpoint[start + 3..];
            rest.find(".amazonaws.com").map(|end| rest[..end].to_string())
        })
        .filter(|region| !region.is_empty())
        .unwrap_or_else(|| "us-east-1".to_string())
}

/// Turns a non-2xx provider response into a storage error carrying its body.
fn check_status(operation: &str, status: u16, body: &[u8]) -> Result<(), GatewayError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let detail = String::from_utf8_lossy(body);
    Err(GatewayError::Storage(format!(
        "{operation} failed: HTTP {status} {}",
        detail.trim()
    )))
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, name: &str, body: Bytes) -> Result<(), GatewayError> {
        let response = self
            .bucket
            .put_object(name, &body)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;
        check_status("put_object", response.status_code(), response.as_slice())
    }

    async fn list_objects(&self) -> Result<Vec<String>, GatewayError> {
        // Bucket::list follows continuation tokens, so every page is drained.
        let pages = self
            .bucket
            .list(String::new(), None)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|object| object.key)
            .collect())
    }

    async fn delete_object(&self, name: &str) -> Result<(), GatewayError> {
        let response = self
            .bucket
            .delete_object(name)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;
        check_status("delete_object", response.status_code(), response.as_slice())
    }

    async fn issue_signed_read_url(
        &self,
        request: &SignedReadRequest,
    ) -> Result<String, GatewayError> {
        tracing::debug!(
            credential = %request.name,
            object = %request.object_name,
            expires_at = %request.expires_at,
            "presigning read URL"
        );

        self.bucket
            .presign_get(&request.object_name, request.ttl_secs(), None)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))
    }
}
