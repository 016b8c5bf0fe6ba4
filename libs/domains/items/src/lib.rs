//! Items Domain
//!
//! This module provides a complete domain implementation for managing items using MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  Handlers / Routes / Stream  │  ← HTTP endpoints (two routing styles + SSE)
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │           Service            │  ← Pipeline: empty/error mapping, RMW update
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │          Repository          │  ← Data access (traits + MongoDB / in-memory)
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │            Models            │  ← Entities, DTOs
//! └──────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_items::{
//!     handlers,
//!     mongodb::MongoItemRepository,
//!     service::ItemService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a MongoDB client
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("mydb");
//!
//! // Create a repository and service
//! let repository = MongoItemRepository::new(db);
//! let service = ItemService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod routes;
pub mod service;
pub mod stream_handlers;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use handlers::ApiDoc;
pub use memory::{InMemoryCappedItemRepository, InMemoryItemRepository};
pub use models::{CreateItem, Item, ItemCapped, UpdateItem};
pub use self::mongodb::{MongoCappedItemRepository, MongoItemRepository};
pub use repository::{CappedItemRepository, CappedItemStream, ItemRepository, ItemStream};
pub use service::{FAULT_PROBE_MESSAGE, ItemService, ItemStreamService};
