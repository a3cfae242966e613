//! # Signed-URL fetch
//!
//! The shared path of `/image` and `/download`: issue a read URL for the
//! object, GET it, and hand back the whole body with the upstream content
//! type. The body is buffered so the upstream connection is released before
//! the gateway starts answering.

use axum::http::header;
use bytes::Bytes;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::signed_url::issue_read_url;

/// Message returned when no read URL could be issued.
pub const URL_ISSUE_FAILED: &str = "Não foi possível gerar URL";

/// Object bytes as returned by the signed URL.
#[derive(Debug)]
pub struct FetchedObject {
    pub body: Bytes,
    /// `Content-Type` declared by the upstream, if any
    pub content_type: Option<String>,
}

/// Fetches `object_name` through a freshly issued signed URL.
///
/// `upstream_failure` is the message reported when the GET answers with a
/// non-success status. No GET is attempted when issuance fails.
pub async fn fetch_object(
    state: &GatewayState,
    object_name: &str,
    upstream_failure: &str,
) -> Result<FetchedObject, GatewayError> {
    let url = issue_read_url(state, object_name)
        .await
        .ok_or_else(|| GatewayError::Storage(URL_ISSUE_FAILED.to_string()))?;

    let response = state
        .http_client
        .get(&url)
        .send()
        .await
        .map_err(|e| GatewayError::Upstream(e.without_url().to_string()))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            object = %object_name,
            status = %status,
            "signed URL fetch returned an error status"
        );
        return Err(GatewayError::Upstream(upstream_failure.to_string()));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = response
        .bytes()
        .await
        .map_err(|e| GatewayError::Upstream(e.without_url().to_string()))?;

    Ok(FetchedObject { body, content_type })
}
