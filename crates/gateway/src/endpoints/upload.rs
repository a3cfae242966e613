//! # POST /enviar
//!
//! Stores the multipart file field `arquivo` under its own filename.

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use bytes::Bytes;
use galeria_types::{MessageResponse, UPLOAD_FIELD};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::with_timeout;

const NO_FILE: &str = "Nenhum arquivo enviado";
const EMPTY_FILENAME: &str = "Nome de arquivo vazio";
const UPLOADED: &str = "Arquivo enviado com sucesso!";

/// The file part of an upload request.
struct UploadedFile {
    file_name: String,
    body: Bytes,
}

/// Reads the first file part named `arquivo`. Parts without a filename are
/// form values, not files, and are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, GatewayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let body = field
            .bytes()
            .await
            .map_err(|e| GatewayError::BadRequest(e.body_text()))?;
        return Ok(Some(UploadedFile { file_name, body }));
    }
    Ok(None)
}

/// POST /enviar: upload a file.
///
/// 400 without a file part or with an empty filename; the store is not
/// touched in that case. An existing object of the same name is replaced.
pub async fn handle_upload(
    State(state): State<Arc<GatewayState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let multipart = multipart.map_err(|_| GatewayError::BadRequest(NO_FILE.to_string()))?;

    let file = read_file_field(multipart)
        .await?
        .ok_or_else(|| GatewayError::BadRequest(NO_FILE.to_string()))?;

    if file.file_name.is_empty() {
        return Err(GatewayError::BadRequest(EMPTY_FILENAME.to_string()));
    }

    let size = file.body.len();
    with_timeout(
        state.store_timeout,
        "put_object",
        state.store.put_object(&file.file_name, file.body),
    )
    .await?;

    tracing::info!(object = %file.file_name, bytes = size, "object uploaded");

    Ok(Json(MessageResponse::new(UPLOADED)))
}
