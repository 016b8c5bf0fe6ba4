//! API routes module
//!
//! Mounts both routing styles over the same domain services:
//! - /v1/items        annotated controller-style handlers
//! - /v1/fun          functional routing table
//! - /v1/stream/items and /v1/fun/stream/items, SSE tail of the capped collection

pub mod health;
pub mod items;
pub mod stream;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/v1/items", items::router(state))
        .nest("/v1/fun", items::fun_router(state))
        .nest("/v1/stream/items", stream::router(state))
        .nest("/v1/fun/stream/items", stream::router(state))
        .merge(health::router(state.clone()))
}
