//! MongoDB implementations of ItemRepository and CappedItemRepository

use async_trait::async_trait;
use futures::StreamExt;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::doc,
    options::{CreateCollectionOptions, CursorType, FindOptions},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, ItemCapped};
use crate::repository::{CappedItemRepository, CappedItemStream, ItemRepository, ItemStream};

/// Maximum number of documents retained in the capped collection
const CAPPED_MAX_DOCUMENTS: u64 = 20;

/// Maximum size in bytes of the capped collection
const CAPPED_MAX_BYTES: u64 = 50_000;

/// Stored form of [`Item`]; the `_id` naming stays at this boundary
#[derive(Debug, Serialize, Deserialize)]
struct ItemDocument {
    #[serde(rename = "_id")]
    id: String,
    description: String,
    price: f64,
}

impl From<Item> for ItemDocument {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            description: item.description,
            price: item.price,
        }
    }
}

impl From<ItemDocument> for Item {
    fn from(document: ItemDocument) -> Self {
        Self {
            id: document.id,
            description: document.description,
            price: document.price,
        }
    }
}

/// Stored form of [`ItemCapped`]
#[derive(Debug, Serialize, Deserialize)]
struct ItemCappedDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "itemName")]
    item_name: String,
    price: f64,
}

impl From<ItemCapped> for ItemCappedDocument {
    fn from(item: ItemCapped) -> Self {
        Self {
            id: item.id,
            item_name: item.item_name,
            price: item.price,
        }
    }
}

impl From<ItemCappedDocument> for ItemCapped {
    fn from(document: ItemCappedDocument) -> Self {
        Self {
            id: document.id,
            item_name: document.item_name,
            price: document.price,
        }
    }
}

/// MongoDB implementation of the ItemRepository
pub struct MongoItemRepository {
    collection: Collection<ItemDocument>,
}

impl MongoItemRepository {
    /// Create a new MongoItemRepository
    ///
    /// # Arguments
    /// * `db` - MongoDB database instance
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("mydb");
    /// let repo = MongoItemRepository::new(db);
    /// ```
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<ItemDocument>("items");
        Self { collection }
    }

    /// Create a new MongoItemRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<ItemDocument>(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> ItemResult<ItemStream> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor
            .map_ok(Item::from)
            .map_err(ItemError::from)
            .boxed())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> ItemResult<Option<Item>> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Item::from))
    }

    #[instrument(skip(self))]
    async fn find_by_description(&self, description: &str) -> ItemResult<Vec<Item>> {
        let cursor = self
            .collection
            .find(doc! { "description": description })
            .await?;
        let documents: Vec<ItemDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self, input))]
    async fn save(&self, input: CreateItem) -> ItemResult<Item> {
        let item = Item::new(input);

        // Upsert so a client-supplied identifier overwrites any existing document
        self.collection
            .replace_one(doc! { "_id": &item.id }, ItemDocument::from(item.clone()))
            .upsert(true)
            .await?;

        tracing::info!(item_id = %item.id, "Item saved");
        Ok(item)
    }

    #[instrument(skip(self, item))]
    async fn replace(&self, item: Item) -> ItemResult<Item> {
        self.collection
            .replace_one(doc! { "_id": &item.id }, ItemDocument::from(item.clone()))
            .await?;

        tracing::info!(item_id = %item.id, "Item replaced");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> ItemResult<()> {
        // Deleting a missing record is still a success
        self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> ItemResult<()> {
        self.collection.delete_many(doc! {}).await?;
        Ok(())
    }
}

/// MongoDB implementation of the CappedItemRepository
///
/// The tail read relies on a tailable-await cursor, which MongoDB only
/// supports on capped collections. Call [`MongoCappedItemRepository::recreate`]
/// before seeding to guarantee the collection exists with the right options.
pub struct MongoCappedItemRepository {
    db: Database,
    collection: Collection<ItemCappedDocument>,
}

impl MongoCappedItemRepository {
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<ItemCappedDocument>("items_capped");
        Self { db, collection }
    }

    /// Create the capped collection when it does not exist yet.
    ///
    /// Tailable cursors require the collection to exist and be capped,
    /// so this runs at startup before any tail read.
    pub async fn ensure(&self) -> ItemResult<()> {
        let existing = self.db.list_collection_names().await?;
        if existing.iter().any(|name| name == "items_capped") {
            return Ok(());
        }
        self.create_capped().await
    }

    /// Drop and recreate the capped collection.
    ///
    /// Capped-ness cannot be added to an existing collection, so the
    /// collection is dropped first.
    pub async fn recreate(&self) -> ItemResult<()> {
        self.collection.drop().await?;
        self.create_capped().await
    }

    async fn create_capped(&self) -> ItemResult<()> {
        let options = CreateCollectionOptions::builder()
            .capped(true)
            .size(CAPPED_MAX_BYTES)
            .max(CAPPED_MAX_DOCUMENTS)
            .build();

        self.db
            .create_collection("items_capped")
            .with_options(options)
            .await?;

        tracing::info!(
            max_documents = CAPPED_MAX_DOCUMENTS,
            max_bytes = CAPPED_MAX_BYTES,
            "Capped collection created"
        );
        Ok(())
    }
}

#[async_trait]
impl CappedItemRepository for MongoCappedItemRepository {
    #[instrument(skip(self, items))]
    async fn insert_all(&self, items: Vec<ItemCapped>) -> ItemResult<Vec<ItemCapped>> {
        if items.is_empty() {
            return Ok(items);
        }

        let documents: Vec<ItemCappedDocument> =
            items.iter().cloned().map(ItemCappedDocument::from).collect();
        self.collection.insert_many(documents).await?;
        tracing::info!(count = items.len(), "Capped items inserted");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn tail(&self) -> ItemResult<CappedItemStream> {
        let options = FindOptions::builder()
            .cursor_type(CursorType::TailableAwait)
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        Ok(cursor
            .map_ok(ItemCapped::from)
            .map_err(ItemError::from)
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_document_maps_id_to_underscore_id() {
        let document = ItemDocument::from(Item {
            id: "ABC".to_string(),
            description: "Boat Headphones".to_string(),
            price: 220.34,
        });
        let bson = mongodb::bson::to_document(&document).unwrap();
        assert_eq!(bson.get_str("_id").unwrap(), "ABC");
        assert!(bson.get("id").is_none());
    }

    #[test]
    fn test_item_document_round_trips_back_to_item() {
        let item = Item {
            id: "ABC".to_string(),
            description: "Boat Headphones".to_string(),
            price: 220.34,
        };
        let back = Item::from(ItemDocument::from(item.clone()));
        assert_eq!(back, item);
    }

    #[test]
    fn test_capped_document_keeps_item_name_field() {
        let document = ItemCappedDocument::from(ItemCapped::new("Samsung TV", 400.0));
        let bson = mongodb::bson::to_document(&document).unwrap();
        assert_eq!(bson.get_str("itemName").unwrap(), "Samsung TV");
        assert!(bson.get("_id").is_some());
    }
}
