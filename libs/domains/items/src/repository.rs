use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, ItemCapped};

/// A stream of items where each element may independently fail
pub type ItemStream = BoxStream<'static, ItemResult<Item>>;

/// A stream of capped items produced by a tailable cursor
pub type CappedItemStream = BoxStream<'static, ItemResult<ItemCapped>>;

/// Repository trait for Item persistence
///
/// This trait defines the data access interface for items.
/// Implementations can use different storage backends (MongoDB, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Stream all items as they arrive from storage
    async fn find_all(&self) -> ItemResult<ItemStream>;

    /// Get an item by ID, None when no record matches
    async fn find_by_id(&self, id: &str) -> ItemResult<Option<Item>>;

    /// Find items with an exact description match
    async fn find_by_description(&self, description: &str) -> ItemResult<Vec<Item>>;

    /// Persist a new item, generating an identifier when absent
    async fn save(&self, input: CreateItem) -> ItemResult<Item>;

    /// Replace an existing item document by its identifier
    async fn replace(&self, item: Item) -> ItemResult<Item>;

    /// Delete an item by ID; deleting a missing record is not an error
    async fn delete_by_id(&self, id: &str) -> ItemResult<()>;

    /// Delete every item
    async fn delete_all(&self) -> ItemResult<()>;
}

/// Repository trait for the capped collection feeding the tail stream
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CappedItemRepository: Send + Sync {
    /// Insert a batch of capped items, evicting the oldest beyond the cap
    async fn insert_all(&self, items: Vec<ItemCapped>) -> ItemResult<Vec<ItemCapped>>;

    /// Open a tail read over the capped collection.
    ///
    /// The stream replays existing documents and then stays open,
    /// yielding new inserts as they happen. It never completes on its own.
    async fn tail(&self) -> ItemResult<CappedItemStream>;
}
