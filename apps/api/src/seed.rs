//! Development data seeding
//!
//! Resets both collections and loads a small fixture set so the API has
//! data to serve right after startup. Only runs in development.

use domain_items::{
    CappedItemRepository, CreateItem, ItemCapped, ItemRepository, MongoCappedItemRepository,
    MongoItemRepository,
};
use tracing::info;

const SEED_ITEMS: [(Option<&str>, &str, f64); 5] = [
    (None, "Samsung TV", 400.0),
    (None, "LG TV", 420.0),
    (None, "Apple watch", 299.99),
    (None, "Beats Headphones", 149.9),
    (Some("ABC"), "Boat Headphones", 220.34),
];

/// Reset the items collection and insert the fixture items
pub async fn seed_items(repository: &MongoItemRepository) -> eyre::Result<()> {
    repository.delete_all().await?;

    for (id, description, price) in SEED_ITEMS {
        let item = repository
            .save(CreateItem {
                id: id.map(str::to_string),
                description: description.to_string(),
                price,
            })
            .await?;
        info!(item_id = %item.id, description = %item.description, "Seeded item");
    }

    Ok(())
}

/// Recreate the capped collection and insert the fixture capped items
pub async fn seed_capped_items(repository: &MongoCappedItemRepository) -> eyre::Result<()> {
    repository.recreate().await?;

    let items: Vec<ItemCapped> = SEED_ITEMS
        .iter()
        .map(|(_, name, price)| ItemCapped::new(*name, *price))
        .collect();
    let inserted = repository.insert_all(items).await?;
    info!(count = inserted.len(), "Seeded capped items");

    Ok(())
}
