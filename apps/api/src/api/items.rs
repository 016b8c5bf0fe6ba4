//! Items API routes
//!
//! This module wires up the items domain to HTTP routes.

use axum::Router;
use domain_items::{ItemService, MongoItemRepository, handlers, routes};

use crate::state::AppState;

fn service(state: &AppState) -> ItemService<MongoItemRepository> {
    let repository = MongoItemRepository::new(state.db.clone());
    ItemService::new(repository)
}

/// Create the annotated items router
pub fn router(state: &AppState) -> Router {
    handlers::router(service(state))
}

/// Create the functional items router
pub fn fun_router(state: &AppState) -> Router {
    routes::router(service(state))
}
