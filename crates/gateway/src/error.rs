//! # Gateway error type
//!
//! Every handler returns `Result<_, GatewayError>`. Client input problems map
//! to 400; anything the store or the upstream fetch reports maps to 500 with
//! the raw message. Callers never get a finer-grained code than that.

use axum::http::StatusCode;
use axum::Json;
use galeria_types::ErrorResponse;

/// Gateway error type.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing file, missing filename and similar
    #[error("{0}")]
    BadRequest(String),
    /// The object store rejected or failed a call
    #[error("{0}")]
    Storage(String),
    /// Fetching a signed URL failed or returned a non-success status
    #[error("{0}")]
    Upstream(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Storage(_) | GatewayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_bad_request_is_400_with_json_body() {
        let response = GatewayError::BadRequest("Nenhum arquivo enviado".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "Nenhum arquivo enviado");
    }

    #[test]
    fn test_provider_failures_are_500() {
        for err in [
            GatewayError::Storage("bucket gone".into()),
            GatewayError::Upstream("HTTP 403".into()),
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_message_is_passed_through_unchanged() {
        let err = GatewayError::Storage("NoSuchBucket: produtos-fotos".into());
        assert_eq!(err.to_string(), "NoSuchBucket: produtos-fotos");
    }
}
