//! # GET /download/{nome}
//!
//! Serves an object as an attachment named after the object, with the
//! content type the upstream declared.

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::config::GatewayState;
use crate::content_type::{attachment_disposition, download_type};
use crate::error::GatewayError;
use crate::fetch::fetch_object;

const DOWNLOAD_FAILED: &str = "Erro ao baixar arquivo";

/// GET /download/{nome}: relay the object as a file download.
pub async fn handle_download(
    State(state): State<Arc<GatewayState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, GatewayError> {
    let nome = super::object_name(path)?;
    let fetched = fetch_object(&state, &nome, DOWNLOAD_FAILED).await?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                download_type(fetched.content_type.as_deref()),
            ),
            (header::CONTENT_DISPOSITION, attachment_disposition(&nome)),
        ],
        fetched.body,
    )
        .into_response())
}
