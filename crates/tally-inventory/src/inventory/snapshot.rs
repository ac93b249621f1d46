//! Flat serialization form of an inventory.
//!
//! An [`Inventory`](super::Inventory) serializes as a plain list of
//! items; the derived indexes are rebuilt when it is deserialized. This
//! is also the sanctioned way to hand inventory contents across a
//! boundary without exposing the internal containers.

use serde::{Deserialize, Serialize};

use crate::error::InventoryError;
use crate::item::Item;

use super::store::Inventory;

/// A flat, order-insensitive copy of an inventory's items.
///
/// Categories that exist but hold no items are not represented; only
/// items survive the round trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot {
    /// Every item in the inventory, in unspecified order.
    pub items: Vec<Item>,
}

impl From<Inventory> for InventorySnapshot {
    fn from(inventory: Inventory) -> Self {
        Self {
            items: inventory.into_items().collect(),
        }
    }
}

impl TryFrom<InventorySnapshot> for Inventory {
    type Error = InventoryError;

    /// Rebuild an inventory, re-deriving all three indexes.
    ///
    /// Fails with [`InventoryError::DuplicateId`] if the snapshot holds
    /// two items with the same id.
    fn try_from(snapshot: InventorySnapshot) -> Result<Self, Self::Error> {
        let mut inventory = Inventory::new();
        for item in snapshot.items {
            inventory.insert(item)?;
        }
        Ok(inventory)
    }
}
