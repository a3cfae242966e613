//! # Signed-URL issuance
//!
//! Mints a fresh one-hour read credential for an object on every call.
//! Nothing is cached: back-to-back fetches of the same object each get their
//! own URL.

use chrono::{DateTime, Duration, Utc};

use crate::config::GatewayState;
use crate::storage::{with_timeout, SignedReadRequest};

/// Lifetime of an issued read URL, in seconds.
pub const SIGNED_URL_TTL_SECS: i64 = 3600;

/// Builds the request for `object_name` issued at `now`.
///
/// The credential name carries the issuance second, so two requests for the
/// same object inside one second share a name.
pub fn read_request(object_name: &str, now: DateTime<Utc>) -> SignedReadRequest {
    SignedReadRequest {
        name: format!("download-{object_name}-{}", now.timestamp()),
        object_name: object_name.to_string(),
        issued_at: now,
        expires_at: now + Duration::seconds(SIGNED_URL_TTL_SECS),
    }
}

/// Asks the store for a read URL to `object_name`.
///
/// Returns `None` on any failure, timeout included, after logging it.
pub async fn issue_read_url(state: &GatewayState, object_name: &str) -> Option<String> {
    let request = read_request(object_name, Utc::now());

    let result = with_timeout(
        state.store_timeout,
        "issue_signed_read_url",
        state.store.issue_signed_read_url(&request),
    )
    .await;

    match result {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(
                object = %object_name,
                credential = %request.name,
                error = %e,
                "failed to issue signed read URL"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration as StdDuration;

    use bytes::Bytes;

    use crate::error::GatewayError;
    use crate::storage::ObjectStore;

    /// Records issued requests; fails or hangs on demand.
    #[derive(Default)]
    struct RecordingStore {
        requests: Mutex<Vec<SignedReadRequest>>,
        fail: bool,
        hang: bool,
    }

    #[async_trait::async_trait]
    impl ObjectStore for RecordingStore {
        async fn put_object(&self, _name: &str, _body: Bytes) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn list_objects(&self) -> Result<Vec<String>, GatewayError> {
            Ok(vec![])
        }

        async fn delete_object(&self, _name: &str) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn issue_signed_read_url(
            &self,
            request: &SignedReadRequest,
        ) -> Result<String, GatewayError> {
            let issued = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.clone());
                requests.len()
            };
            if self.hang {
                tokio::time::sleep(StdDuration::from_secs(30)).await;
            }
            if self.fail {
                return Err(GatewayError::Storage("NotAuthorizedOrNotFound".into()));
            }
            Ok(format!("http://mock-storage/p/{}?n={issued}", request.name))
        }
    }

    fn state_with(store: RecordingStore, timeout: StdDuration) -> GatewayState {
        GatewayState::new(Box::new(store), timeout).unwrap()
    }

    #[test]
    fn test_read_request_name_and_expiry() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let request = read_request("cat.jpg", now);

        assert_eq!(request.name, "download-cat.jpg-1700000000");
        assert_eq!(request.object_name, "cat.jpg");
        assert_eq!(request.issued_at, now);
        assert_eq!(request.expires_at - request.issued_at, Duration::hours(1));
        assert_eq!(request.ttl_secs(), 3600);
    }

    #[tokio::test]
    async fn test_issue_returns_url_and_never_caches() {
        let state = state_with(RecordingStore::default(), StdDuration::from_secs(5));

        let first = issue_read_url(&state, "cat.jpg").await.unwrap();
        let second = issue_read_url(&state, "cat.jpg").await.unwrap();
        assert!(first.starts_with("http://mock-storage/p/download-cat.jpg-"));
        assert!(first.ends_with("?n=1"));
        assert!(second.ends_with("?n=2"));
    }

    #[tokio::test]
    async fn test_issue_failure_is_none() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let state = state_with(store, StdDuration::from_secs(5));
        assert!(issue_read_url(&state, "cat.jpg").await.is_none());
    }

    #[tokio::test]
    async fn test_issue_timeout_is_none() {
        let store = RecordingStore {
            hang: true,
            ..Default::default()
        };
        let state = state_with(store, StdDuration::from_millis(50));
        assert!(issue_read_url(&state, "cat.jpg").await.is_none());
    }
}
