//! # Gateway endpoints
//!
//! One module per route. Handlers take `State<Arc<GatewayState>>` and return
//! `Result<_, GatewayError>`; the error type renders the JSON error body.

use axum::extract::rejection::PathRejection;
use axum::extract::Path;

use crate::error::GatewayError;

pub mod index;
pub mod upload;
pub mod list;
pub mod delete;
pub mod image;
pub mod download;

pub use index::{handle_app_js, handle_index};
pub use upload::handle_upload;
pub use list::handle_list;
pub use delete::handle_delete;
pub use image::handle_image;
pub use download::handle_download;

/// Object name from the `{nome}` segment. A segment that does not decode to
/// UTF-8 is a 400 with the usual JSON error body.
pub(crate) fn object_name(
    path: Result<Path<String>, PathRejection>,
) -> Result<String, GatewayError> {
    path.map(|Path(nome)| nome)
        .map_err(|e| GatewayError::BadRequest(e.body_text()))
}
