//! Item services - the shared asynchronous pipeline
//!
//! Both routing styles (annotated handlers and the functional routing table)
//! are thin adapters over these services. Empty-result and error mapping
//! happen here exactly once.

use futures::{StreamExt, stream};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, ItemCapped, UpdateItem};
use crate::repository::{CappedItemRepository, CappedItemStream, ItemRepository, ItemStream};

/// Message carried by the fault-injection probe
pub const FAULT_PROBE_MESSAGE: &str = "Runtime Exception occurred";

/// Item service providing the pipeline operations
///
/// The service layer owns the not-found-on-empty mapping and the
/// read-modify-write update so neither adapter duplicates them.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

impl<R: ItemRepository> ItemService<R> {
    /// Create a new ItemService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Stream all items
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ItemResult<ItemStream> {
        self.repository.find_all().await
    }

    /// Get an item by ID, mapping a missing record to NotFound
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: &str) -> ItemResult<Item> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ItemError::NotFound(id.to_string()))
    }

    /// Find items with an exact description match
    #[instrument(skip(self))]
    pub async fn find_by_description(&self, description: &str) -> ItemResult<Vec<Item>> {
        self.repository.find_by_description(description).await
    }

    /// Create a new item
    #[instrument(skip(self, input))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        self.repository.save(input).await
    }

    /// Update an existing item with a read-modify-write cycle.
    ///
    /// The write only happens when the lookup yields a record; a missing
    /// record resolves as NotFound without touching storage.
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: &str, input: UpdateItem) -> ItemResult<Item> {
        let mut existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ItemError::NotFound(id.to_string()))?;

        existing.apply_update(input);
        self.repository.replace(existing).await
    }

    /// Delete an item; deleting a missing record still succeeds
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> ItemResult<()> {
        self.repository.delete_by_id(id).await
    }

    /// Fault-injection probe: the full list sequence followed by a
    /// terminal fault, proving fault-after-partial-success is surfaced
    #[instrument(skip(self))]
    pub async fn fault_probe(&self) -> ItemResult<ItemStream> {
        let items = self.repository.find_all().await?;
        let fault = stream::once(async {
            Err(ItemError::Internal(FAULT_PROBE_MESSAGE.to_string()))
        });
        Ok(items.chain(fault).boxed())
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Service over the capped collection feeding the tail stream
pub struct ItemStreamService<R: CappedItemRepository> {
    repository: Arc<R>,
}

impl<R: CappedItemRepository> ItemStreamService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Insert a batch of capped items
    #[instrument(skip(self, items))]
    pub async fn insert_all(&self, items: Vec<ItemCapped>) -> ItemResult<Vec<ItemCapped>> {
        self.repository.insert_all(items).await
    }

    /// Open a tail read; the stream stays open for new inserts
    #[instrument(skip(self))]
    pub async fn tail(&self) -> ItemResult<CappedItemStream> {
        self.repository.tail().await
    }
}

impl<R: CappedItemRepository> Clone for ItemStreamService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockItemRepository;
    use futures::TryStreamExt;
    use mockall::predicate::eq;

    fn sample_item() -> Item {
        Item {
            id: "ABC".to_string(),
            description: "Boat Headphones".to_string(),
            price: 220.34,
        }
    }

    #[tokio::test]
    async fn test_get_item_found() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_by_id()
            .with(eq("ABC"))
            .returning(|_| Ok(Some(sample_item())));

        let service = ItemService::new(repo);
        let item = service.get_item("ABC").await.unwrap();
        assert_eq!(item.description, "Boat Headphones");
    }

    #[tokio::test]
    async fn test_get_item_missing_maps_to_not_found() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ItemService::new(repo);
        let err = service.get_item("missing").await.unwrap_err();
        assert!(matches!(err, ItemError::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_update_item_applies_fields_and_replaces() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_by_id()
            .with(eq("ABC"))
            .returning(|_| Ok(Some(sample_item())));
        repo.expect_replace()
            .withf(|item| item.id == "ABC" && item.price == 129.99)
            .returning(|item| Ok(item));

        let service = ItemService::new(repo);
        let updated = service
            .update_item(
                "ABC",
                UpdateItem {
                    description: None,
                    price: Some(129.99),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 129.99);
        assert_eq!(updated.description, "Boat Headphones");
    }

    #[tokio::test]
    async fn test_update_missing_item_never_writes() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        // No expect_replace: a replace call would panic the mock

        let service = ItemService::new(repo);
        let err = service
            .update_item("missing", UpdateItem::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ItemError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_item_is_idempotent() {
        let mut repo = MockItemRepository::new();
        repo.expect_delete_by_id().returning(|_| Ok(()));

        let service = ItemService::new(repo);
        assert!(service.delete_item("anything").await.is_ok());
    }

    #[tokio::test]
    async fn test_fault_probe_yields_items_then_fault() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_all().returning(|| {
            let items = vec![Ok(sample_item()), Ok(sample_item())];
            Ok(stream::iter(items).boxed())
        });

        let service = ItemService::new(repo);
        let mut probe = service.fault_probe().await.unwrap();

        let mut seen = 0;
        let mut fault = None;
        while let Some(next) = probe.next().await {
            match next {
                Ok(_) => seen += 1,
                Err(e) => {
                    fault = Some(e);
                    break;
                }
            }
        }

        assert_eq!(seen, 2);
        match fault {
            Some(ItemError::Internal(msg)) => assert_eq!(msg, FAULT_PROBE_MESSAGE),
            other => panic!("expected internal fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fault_probe_collect_fails_atomically() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(stream::iter(vec![Ok(sample_item())]).boxed()));

        let service = ItemService::new(repo);
        let probe = service.fault_probe().await.unwrap();
        let collected: ItemResult<Vec<Item>> = probe.try_collect().await;
        assert!(collected.is_err());
    }
}
