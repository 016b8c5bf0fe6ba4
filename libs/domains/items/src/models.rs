use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Item entity - represents an item stored in MongoDB
///
/// Serializes with a plain `id` field; the `_id` mapping lives in the
/// MongoDB document types, so HTTP payloads never carry Mongo naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Unique identifier
    pub id: String,
    /// Item description
    pub description: String,
    /// Price
    pub price: f64,
}

/// DTO for creating a new item
///
/// When `id` is omitted a UUIDv7 string is generated.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateItem {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub description: String,
    pub price: f64,
}

/// DTO for updating an existing item
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateItem {
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// Item stored in the capped collection that backs the tail stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemCapped {
    /// Unique identifier
    pub id: String,
    /// Item name
    #[serde(rename = "itemName")]
    pub item_name: String,
    /// Price
    pub price: f64,
}

impl Item {
    /// Create a new item from CreateItem DTO
    pub fn new(input: CreateItem) -> Self {
        Self {
            id: input.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
            description: input.description,
            price: input.price,
        }
    }

    /// Apply updates from UpdateItem DTO
    pub fn apply_update(&mut self, update: UpdateItem) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
    }
}

impl ItemCapped {
    /// Create a new capped item with a generated identifier
    pub fn new(item_name: impl Into<String>, price: f64) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            item_name: item_name.into(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_generates_id() {
        let item = Item::new(CreateItem {
            id: None,
            description: "Iphone X".to_string(),
            price: 999.99,
        });
        assert!(!item.id.is_empty());
        assert_eq!(item.description, "Iphone X");
    }

    #[test]
    fn test_new_item_keeps_provided_id() {
        let item = Item::new(CreateItem {
            id: Some("ABC".to_string()),
            description: "Boat Headphones".to_string(),
            price: 220.34,
        });
        assert_eq!(item.id, "ABC");
    }

    #[test]
    fn test_apply_update_partial() {
        let mut item = Item {
            id: "ABC".to_string(),
            description: "Boat Headphones".to_string(),
            price: 220.34,
        };
        item.apply_update(UpdateItem {
            description: None,
            price: Some(129.99),
        });
        assert_eq!(item.description, "Boat Headphones");
        assert_eq!(item.price, 129.99);
    }

    #[test]
    fn test_item_serializes_plain_id_field() {
        let item = Item {
            id: "ABC".to_string(),
            description: "Boat Headphones".to_string(),
            price: 220.34,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "ABC");
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_item_capped_serializes_item_name_camel_case() {
        let item = ItemCapped::new("Samsung TV", 400.0);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["itemName"], "Samsung TV");
        assert_eq!(json["price"], 400.0);
    }
}
