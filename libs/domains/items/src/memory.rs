//! In-memory implementations of the item repositories
//!
//! Useful for handler tests and local experimentation without MongoDB.
//! The capped variant mirrors the eviction behavior of a capped collection
//! and feeds its tail stream from a broadcast channel.

use async_trait::async_trait;
use futures::{StreamExt, stream};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, ItemCapped};
use crate::repository::{CappedItemRepository, CappedItemStream, ItemRepository, ItemStream};

/// In-memory ItemRepository backed by a Vec, preserving insertion order
#[derive(Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<Vec<Item>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_all(&self) -> ItemResult<ItemStream> {
        let snapshot = self.items.read().await.clone();
        Ok(stream::iter(snapshot.into_iter().map(Ok)).boxed())
    }

    async fn find_by_id(&self, id: &str) -> ItemResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn find_by_description(&self, description: &str) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| item.description == description)
            .cloned()
            .collect())
    }

    async fn save(&self, input: CreateItem) -> ItemResult<Item> {
        let item = Item::new(input);
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(item)
    }

    async fn replace(&self, item: Item) -> ItemResult<Item> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(item)
    }

    async fn delete_by_id(&self, id: &str) -> ItemResult<()> {
        let mut items = self.items.write().await;
        items.retain(|item| item.id != id);
        Ok(())
    }

    async fn delete_all(&self) -> ItemResult<()> {
        let mut items = self.items.write().await;
        items.clear();
        Ok(())
    }
}

/// In-memory CappedItemRepository with bounded retention and live tailing
pub struct InMemoryCappedItemRepository {
    buffer: Arc<RwLock<VecDeque<ItemCapped>>>,
    tx: broadcast::Sender<ItemCapped>,
    capacity: usize,
}

impl InMemoryCappedItemRepository {
    pub fn new() -> Self {
        Self::with_capacity(20)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            tx,
            capacity,
        }
    }
}

impl Default for InMemoryCappedItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CappedItemRepository for InMemoryCappedItemRepository {
    async fn insert_all(&self, items: Vec<ItemCapped>) -> ItemResult<Vec<ItemCapped>> {
        let mut buffer = self.buffer.write().await;
        for item in &items {
            if buffer.len() == self.capacity {
                buffer.pop_front();
            }
            buffer.push_back(item.clone());
            // No receivers is fine, nothing is tailing yet
            let _ = self.tx.send(item.clone());
        }
        Ok(items)
    }

    async fn tail(&self) -> ItemResult<CappedItemStream> {
        // Snapshot and subscribe under the same lock that inserts take for
        // writing, so the replay and the live feed neither skip nor repeat
        let buffer = self.buffer.read().await;
        let snapshot: Vec<ItemCapped> = buffer.iter().cloned().collect();
        let mut rx = self.tx.subscribe();
        drop(buffer);

        let live = async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(item) => yield Ok(item),
                    // A slow reader skips evicted entries, mirroring a
                    // capped collection overwriting old documents
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    // A tail read never completes on its own
                    Err(broadcast::error::RecvError::Closed) => {
                        futures::future::pending::<()>().await;
                    }
                }
            }
        };

        Ok(stream::iter(snapshot.into_iter().map(Ok)).chain(live).boxed())
    }
}
