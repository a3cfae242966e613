//! # Galeria shared types
//!
//! JSON bodies exchanged between the gateway and its clients (the landing
//! page script, tests, scripts driving the HTTP API).
//!
//! Field names follow the public API (`nome`, `url`, `message`, `error`)
//! and must not be renamed.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Multipart field name carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "arquivo";

/// Prefix of the inline-serve route. Listing entries point here.
pub const IMAGE_ROUTE_PREFIX: &str = "/image/";

/// Local access path for an object, e.g. `/image/cat.jpg`.
///
/// The remote signed URL is only issued when this path is fetched.
pub fn image_path(name: &str) -> String {
    format!("{IMAGE_ROUTE_PREFIX}{name}")
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// One object of `GET /obter-objetos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Object name in the bucket
    pub nome: String,
    /// Local route serving the object inline
    pub url: String,
}

impl ListingEntry {
    pub fn for_object(name: impl Into<String>) -> Self {
        let nome = name.into();
        let url = image_path(&nome);
        Self { nome, url }
    }
}

/// Success body of upload and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body returned with every 4xx/5xx.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
