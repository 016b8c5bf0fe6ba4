//! Functional routing table for the items API
//!
//! Same pipeline as [`crate::handlers`], exposed as a plain routing table
//! without OpenAPI annotations. Mounted under /v1/fun by the application.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use futures::TryStreamExt;
use std::sync::Arc;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, UpdateItem};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// Create the functional items router
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/runtimeexception", get(runtime_exception))
        .with_state(shared_service)
}

async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<Vec<Item>>> {
    let items: Vec<Item> = service.list_items().await?.try_collect().await?;
    Ok(Json(items))
}

async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Json(input): Json<CreateItem>,
) -> ItemResult<impl IntoResponse> {
    let item = service.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
) -> ItemResult<Json<Item>> {
    let item = service.get_item(&id).await?;
    Ok(Json(item))
}

async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
    Json(input): Json<UpdateItem>,
) -> ItemResult<Json<Item>> {
    let item = service.update_item(&id, input).await?;
    Ok(Json(item))
}

async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
) -> ItemResult<impl IntoResponse> {
    service.delete_item(&id).await?;
    Ok(StatusCode::OK)
}

async fn runtime_exception<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<Vec<Item>>> {
    let items: Vec<Item> = service.fault_probe().await?.try_collect().await?;
    Ok(Json(items))
}
