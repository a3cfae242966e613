//! # GET /obter-objetos
//!
//! Lists the bucket as `[{nome, url}]`.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use galeria_types::ListingEntry;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::with_timeout;

/// GET /obter-objetos: one entry per object, in store order.
///
/// `url` is the gateway's own `/image/<nome>` route; no signed URL is issued
/// while listing.
pub async fn handle_list(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<Vec<ListingEntry>>, GatewayError> {
    let names = with_timeout(
        state.store_timeout,
        "list_objects",
        state.store.list_objects(),
    )
    .await?;

    Ok(Json(names.into_iter().map(ListingEntry::for_object).collect()))
}
