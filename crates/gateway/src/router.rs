//! # Gateway router
//!
//! Route table of the public HTTP surface.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::GatewayState;
use crate::endpoints::{
    handle_app_js, handle_delete, handle_download, handle_image, handle_index, handle_list,
    handle_upload,
};

/// Builds the gateway router. `max_upload_bytes` bounds the body of
/// `POST /enviar`.
pub fn build_router(state: Arc<GatewayState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/static/app.js", get(handle_app_js))
        .route(
            "/enviar",
            post(handle_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/obter-objetos", get(handle_list))
        .route("/excluir/{nome}", delete(handle_delete))
        .route("/image/{nome}", get(handle_image))
        .route("/download/{nome}", get(handle_download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
