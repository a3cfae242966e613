//! # DELETE /excluir/{nome}

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use galeria_types::MessageResponse;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::with_timeout;

const DELETED: &str = "Excluído com sucesso";

/// DELETE /excluir/{nome}: unconditional delete.
///
/// Whatever the store says about a missing object is passed through.
pub async fn handle_delete(
    State(state): State<Arc<GatewayState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let nome = super::object_name(path)?;

    with_timeout(
        state.store_timeout,
        "delete_object",
        state.store.delete_object(&nome),
    )
    .await?;

    tracing::info!(object = %nome, "object deleted");

    Ok(Json(MessageResponse::new(DELETED)))
}
