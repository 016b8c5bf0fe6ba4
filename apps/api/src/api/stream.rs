//! Streaming items API routes
//!
//! Tails the capped collection over SSE. Mounted twice so both route
//! styles expose the same stream.

use axum::Router;
use domain_items::{ItemStreamService, MongoCappedItemRepository, stream_handlers};

use crate::state::AppState;

/// Create the streaming items router
pub fn router(state: &AppState) -> Router {
    let repository = MongoCappedItemRepository::new(state.db.clone());
    let service = ItemStreamService::new(repository);
    stream_handlers::router(service)
}
