//! # GET /image/{nome}
//!
//! Serves an object inline with an image content type guessed from its
//! name.

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::config::GatewayState;
use crate::content_type::inline_image_type;
use crate::error::GatewayError;
use crate::fetch::fetch_object;

const IMAGE_FETCH_FAILED: &str = "Erro ao carregar imagem";

/// GET /image/{nome}: relay the object through a fresh signed URL.
pub async fn handle_image(
    State(state): State<Arc<GatewayState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, GatewayError> {
    let nome = super::object_name(path)?;
    let fetched = match fetch_object(&state, &nome, IMAGE_FETCH_FAILED).await {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::error!(object = %nome, error = %e, "failed to serve image");
            return Err(e);
        }
    };

    Ok((
        [(header::CONTENT_TYPE, inline_image_type(&nome))],
        fetched.body,
    )
        .into_response())
}
