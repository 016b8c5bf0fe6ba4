//! MongoDB repository integration tests
//!
//! These run against a real MongoDB instance and are ignored by default:
//!
//! ```sh
//! MONGODB_URL=mongodb://localhost:27017 cargo test -- --ignored
//! ```

use domain_items::{
    CappedItemRepository, CreateItem, Item, ItemCapped, ItemRepository, MongoCappedItemRepository,
    MongoItemRepository,
};
use futures::{StreamExt, TryStreamExt};
use mongodb::Client;
use std::time::Duration;

async fn test_database(suffix: &str) -> mongodb::Database {
    let url =
        std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = Client::with_uri_str(&url).await.unwrap();
    let db = client.database(&format!("items_test_{}", suffix));
    db.drop().await.unwrap();
    db
}

async fn seeded_repo(suffix: &str) -> MongoItemRepository {
    let repo = MongoItemRepository::new(test_database(suffix).await);
    let seed = [
        (None, "Samsung TV", 400.0),
        (None, "LG TV", 420.0),
        (None, "Apple watch", 299.99),
        (None, "Beats Headphones", 149.9),
        (Some("ABC"), "Boat Headphones", 220.34),
    ];
    for (id, description, price) in seed {
        repo.save(CreateItem {
            id: id.map(str::to_string),
            description: description.to_string(),
            price,
        })
        .await
        .unwrap();
    }
    repo
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_find_all_streams_all_items() {
    let repo = seeded_repo("find_all").await;

    let items: Vec<Item> = repo.find_all().await.unwrap().try_collect().await.unwrap();
    assert_eq!(items.len(), 5);
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_find_by_id_and_missing() {
    let repo = seeded_repo("find_by_id").await;

    let found = repo.find_by_id("ABC").await.unwrap().unwrap();
    assert_eq!(found.description, "Boat Headphones");
    assert!(repo.find_by_id("DEF").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_find_by_description() {
    let repo = seeded_repo("find_by_description").await;

    let items = repo.find_by_description("Boat Headphones").await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "ABC");
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_save_with_existing_id_overwrites() {
    let repo = seeded_repo("save_upsert").await;

    let saved = repo
        .save(CreateItem {
            id: Some("ABC".to_string()),
            description: "Boat Headphones v2".to_string(),
            price: 199.99,
        })
        .await
        .unwrap();
    assert_eq!(saved.id, "ABC");

    let found = repo.find_by_id("ABC").await.unwrap().unwrap();
    assert_eq!(found.description, "Boat Headphones v2");

    let all: Vec<Item> = repo.find_all().await.unwrap().try_collect().await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_delete_by_id_is_idempotent() {
    let repo = seeded_repo("delete").await;

    repo.delete_by_id("ABC").await.unwrap();
    assert!(repo.find_by_id("ABC").await.unwrap().is_none());
    // Deleting again is still a success
    repo.delete_by_id("ABC").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires actual MongoDB
async fn test_capped_tail_replays_and_follows() {
    let db = test_database("capped_tail").await;
    let repo = MongoCappedItemRepository::new(db);
    repo.recreate().await.unwrap();

    repo.insert_all(vec![
        ItemCapped::new("Samsung TV", 400.0),
        ItemCapped::new("LG TV", 420.0),
    ])
    .await
    .unwrap();

    let mut tail = repo.tail().await.unwrap();
    assert_eq!(tail.next().await.unwrap().unwrap().item_name, "Samsung TV");
    assert_eq!(tail.next().await.unwrap().unwrap().item_name, "LG TV");

    repo.insert_all(vec![ItemCapped::new("Apple watch", 299.99)])
        .await
        .unwrap();
    let pushed = tokio::time::timeout(Duration::from_secs(5), tail.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(pushed.item_name, "Apple watch");
}
