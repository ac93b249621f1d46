//! Inventory item types.

use crate::ids::ItemId;
use serde::{Deserialize, Serialize};

/// A single inventory record.
///
/// Items are owned by the [`Inventory`](crate::Inventory) that holds
/// them; `id` and `category` are fixed at creation, while `quantity` and
/// `threshold` change through
/// [`Inventory::update_item`](crate::Inventory::update_item).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Category the item belongs to.
    pub category: String,
    /// Units currently on hand.
    pub quantity: u64,
    /// Restock trigger level.
    pub threshold: u64,
}

impl Item {
    /// Create a new item.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: u64,
        threshold: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            quantity,
            threshold,
        }
    }

    /// Check whether the item is below its restock threshold.
    pub fn needs_restock(&self) -> bool {
        self.quantity < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_restock_below_threshold() {
        let item = Item::new("sku-1", "Hex Bolt", "Hardware", 3, 10);
        assert!(item.needs_restock());
    }

    #[test]
    fn test_no_restock_at_threshold() {
        // Restock triggers strictly below the threshold.
        let item = Item::new("sku-1", "Hex Bolt", "Hardware", 10, 10);
        assert!(!item.needs_restock());

        let item = Item::new("sku-2", "Wing Nut", "Hardware", 11, 10);
        assert!(!item.needs_restock());
    }

    #[test]
    fn test_item_serialization() {
        let item = Item::new("sku-1", "Hex Bolt", "Hardware", 40, 10);
        let json = serde_json::to_string(&item).unwrap();

        let deserialized: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, item);
    }
}
