//! Inventory error types.

use crate::ids::ItemId;
use thiserror::Error;

/// Errors that can occur in inventory operations.
///
/// These are expected, recoverable conditions returned as values; the
/// store never panics on them and a failed operation leaves the
/// inventory unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// An item with this id already exists.
    #[error("Item already exists: {0}")]
    DuplicateId(ItemId),

    /// Item not found.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}
