//! The `Inventory` store and its derived indexes.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InventoryError;
use crate::ids::ItemId;
use crate::item::Item;

use super::snapshot::InventorySnapshot;

/// In-memory inventory, indexed three ways:
///
/// - by category, each category's items kept sorted by quantity descending
/// - by item id, for existence checks and category lookup
/// - by quantity, for top-K queries without a full sort
///
/// Every mutating operation validates its inputs first and then updates
/// all indexes together, so a failed call leaves the store untouched.
/// Reads hand out shared references only; the sole mutation path is this
/// API.
///
/// Serializes as a flat item list (see
/// [`InventorySnapshot`](super::InventorySnapshot)).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "InventorySnapshot", try_from = "InventorySnapshot")]
pub struct Inventory {
    /// Items grouped by category, sorted by quantity descending.
    by_category: HashMap<String, Vec<Item>>,
    /// Item id -> owning category. The authoritative existence index.
    category_of: HashMap<ItemId, String>,
    /// Quantity -> ids currently holding that quantity, in insertion
    /// order. Empty buckets are pruned.
    by_quantity: BTreeMap<u64, Vec<ItemId>>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new item.
    ///
    /// The category is created on first use. Returns
    /// [`InventoryError::DuplicateId`] if an item with this id already
    /// exists; the existing item is untouched.
    pub fn add_item(
        &mut self,
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: u64,
        threshold: u64,
    ) -> Result<(), InventoryError> {
        self.insert(Item::new(id, name, category, quantity, threshold))
    }

    /// Insert a pre-built item into all three indexes.
    pub(crate) fn insert(&mut self, item: Item) -> Result<(), InventoryError> {
        if self.category_of.contains_key(&item.id) {
            return Err(InventoryError::DuplicateId(item.id));
        }

        debug!(id = %item.id, category = %item.category, quantity = item.quantity, "item added");

        self.category_of.insert(item.id.clone(), item.category.clone());
        self.by_quantity
            .entry(item.quantity)
            .or_default()
            .push(item.id.clone());

        let items = self.by_category.entry(item.category.clone()).or_default();
        items.push(item);
        sort_by_quantity(items);

        Ok(())
    }

    /// Get an item by id.
    ///
    /// Returns a shared reference to the live item; mutate it through
    /// [`update_item`](Self::update_item).
    pub fn get_item(&self, id: &ItemId) -> Result<&Item, InventoryError> {
        let category = self
            .category_of
            .get(id)
            .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))?;

        self.by_category
            .get(category)
            .and_then(|items| items.iter().find(|item| &item.id == id))
            .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))
    }

    /// Set an item's quantity and threshold.
    ///
    /// When the quantity changes, the id moves to its new quantity
    /// bucket and the owning category is re-sorted.
    pub fn update_item(
        &mut self,
        id: &ItemId,
        quantity: u64,
        threshold: u64,
    ) -> Result<(), InventoryError> {
        let category = self
            .category_of
            .get(id)
            .cloned()
            .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))?;

        let old_quantity = {
            let items = self
                .by_category
                .get_mut(&category)
                .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))?;
            let pos = items
                .iter()
                .position(|item| &item.id == id)
                .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))?;

            let old_quantity = items[pos].quantity;
            items[pos].quantity = quantity;
            items[pos].threshold = threshold;
            if old_quantity != quantity {
                sort_by_quantity(items);
            }
            old_quantity
        };

        if old_quantity != quantity {
            self.unindex_quantity(id, old_quantity);
            self.by_quantity.entry(quantity).or_default().push(id.clone());
        }

        debug!(%id, quantity, threshold, "item updated");
        Ok(())
    }

    /// Remove an item, returning it.
    ///
    /// The id is dropped from all three indexes in the same call. The
    /// category entry itself is retained, so a category stays
    /// recognizable after its last item is removed.
    pub fn remove_item(&mut self, id: &ItemId) -> Result<Item, InventoryError> {
        let category = self
            .category_of
            .get(id)
            .cloned()
            .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))?;

        let item = {
            let items = self
                .by_category
                .get_mut(&category)
                .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))?;
            let pos = items
                .iter()
                .position(|item| &item.id == id)
                .ok_or_else(|| InventoryError::ItemNotFound(id.clone()))?;
            items.remove(pos)
        };

        self.category_of.remove(id);
        self.unindex_quantity(id, item.quantity);

        debug!(%id, category = %item.category, "item removed");
        Ok(item)
    }

    /// Get all items in a category, sorted by quantity descending.
    ///
    /// Returns [`InventoryError::CategoryNotFound`] only for categories
    /// that have never held an item; a category emptied by removals
    /// yields an empty slice.
    pub fn get_category(&self, category: &str) -> Result<&[Item], InventoryError> {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .ok_or_else(|| InventoryError::CategoryNotFound(category.to_string()))
    }

    /// Get all items below their restock threshold.
    ///
    /// Recomputed from scratch on every call; the result order is
    /// unspecified.
    pub fn restock_needed(&self) -> Vec<&Item> {
        self.by_category
            .values()
            .flatten()
            .filter(|item| item.needs_restock())
            .collect()
    }

    /// Get the `k` items with the highest quantities.
    ///
    /// Walks the quantity index from highest to lowest; ties resolve in
    /// bucket insertion order, which makes the result deterministic.
    /// `k == 0` yields an empty vector and `k` beyond the item count
    /// yields every item.
    pub fn top_k(&self, k: usize) -> Vec<&Item> {
        let mut top = Vec::new();
        for ids in self.by_quantity.values().rev() {
            for id in ids {
                if top.len() == k {
                    return top;
                }
                if let Ok(item) = self.get_item(id) {
                    top.push(item);
                }
            }
        }
        top
    }

    /// Iterate over all items, grouped by category.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.by_category.values().flatten()
    }

    /// Consume the inventory, yielding all items.
    pub fn into_items(self) -> impl Iterator<Item = Item> {
        self.by_category.into_values().flatten()
    }

    /// Iterate over all known category names, including emptied ones.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys().map(String::as_str)
    }

    /// Number of live items.
    pub fn item_count(&self) -> usize {
        self.category_of.len()
    }

    /// Number of known categories, including emptied ones.
    pub fn category_count(&self) -> usize {
        self.by_category.len()
    }

    /// Check if the inventory holds no items.
    pub fn is_empty(&self) -> bool {
        self.category_of.is_empty()
    }

    /// Check if an item with this id exists.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.category_of.contains_key(id)
    }

    /// Remove all items and categories.
    pub fn clear(&mut self) {
        self.by_category.clear();
        self.category_of.clear();
        self.by_quantity.clear();
    }

    /// Drop an id from its quantity bucket, pruning the bucket if it
    /// empties.
    fn unindex_quantity(&mut self, id: &ItemId, quantity: u64) {
        let emptied = match self.by_quantity.get_mut(&quantity) {
            Some(bucket) => {
                bucket.retain(|bucketed| bucketed != id);
                bucket.is_empty()
            }
            None => false,
        };
        if emptied {
            self.by_quantity.remove(&quantity);
        }
    }
}

/// Stable descending sort; equal quantities keep their relative order.
fn sort_by_quantity(items: &mut [Item]) {
    items.sort_by(|a, b| b.quantity.cmp(&a.quantity));
}
