//! Merging one inventory into another.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ids::ItemId;
use crate::item::Item;

use super::store::Inventory;

/// Outcome of a single item during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// The id was new; the item was inserted wholesale.
    Inserted,
    /// The id existed with a lower quantity; the quantity was raised.
    Updated,
    /// The id existed with an equal or higher quantity; nothing changed.
    Kept,
    /// The item's individual sub-operation failed; the rest of the
    /// merge continued without it.
    Skipped,
}

/// Per-item outcomes of [`Inventory::merge`], in merge order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// One entry per incoming item.
    pub outcomes: Vec<(ItemId, MergeOutcome)>,
}

impl MergeReport {
    /// Number of incoming items processed.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if the merge saw no items at all.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of newly inserted items.
    pub fn inserted(&self) -> usize {
        self.count(MergeOutcome::Inserted)
    }

    /// Number of items whose quantity was raised.
    pub fn updated(&self) -> usize {
        self.count(MergeOutcome::Updated)
    }

    /// Number of items left unchanged.
    pub fn kept(&self) -> usize {
        self.count(MergeOutcome::Kept)
    }

    /// Number of items skipped by per-item failures.
    pub fn skipped(&self) -> usize {
        self.count(MergeOutcome::Skipped)
    }

    /// Look up the outcome recorded for an id.
    pub fn outcome_for(&self, id: &ItemId) -> Option<MergeOutcome> {
        self.outcomes
            .iter()
            .find(|(recorded, _)| recorded == id)
            .map(|(_, outcome)| *outcome)
    }

    fn count(&self, outcome: MergeOutcome) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, recorded)| *recorded == outcome)
            .count()
    }
}

impl Inventory {
    /// Merge another inventory into this one.
    ///
    /// For ids present in both, the higher quantity wins: this
    /// inventory's quantity is raised when the incoming one is strictly
    /// greater, and its name, category and threshold are never touched.
    /// On a tie the existing quantity is kept, so `a.merge(b)` and
    /// `b.merge(a)` need not agree. Ids new to this inventory are
    /// inserted through the same path as
    /// [`add_item`](Inventory::add_item), creating their category if
    /// needed.
    ///
    /// The merge never fails as a whole: a per-item failure is recorded
    /// as [`MergeOutcome::Skipped`] (and logged) while the remaining
    /// items are still processed.
    pub fn merge(&mut self, other: Inventory) -> MergeReport {
        let mut report = MergeReport::default();
        for item in other.into_items() {
            let id = item.id.clone();
            let outcome = self.merge_item(item);
            report.outcomes.push((id, outcome));
        }
        report
    }

    fn merge_item(&mut self, item: Item) -> MergeOutcome {
        let existing = self
            .get_item(&item.id)
            .map(|existing| (existing.quantity, existing.threshold))
            .ok();

        match existing {
            Some((quantity, _)) if quantity >= item.quantity => MergeOutcome::Kept,
            Some((quantity, threshold)) => {
                // Raise the quantity only; the threshold is re-applied
                // unchanged so the update moves the quantity bucket and
                // re-sorts the category without touching anything else.
                match self.update_item(&item.id, item.quantity, threshold) {
                    Ok(()) => {
                        debug!(id = %item.id, from = quantity, to = item.quantity, "merge raised quantity");
                        MergeOutcome::Updated
                    }
                    Err(err) => {
                        warn!(id = %item.id, %err, "merge failed to update item");
                        MergeOutcome::Skipped
                    }
                }
            }
            None => {
                let id = item.id.clone();
                match self.insert(item) {
                    Ok(()) => MergeOutcome::Inserted,
                    Err(err) => {
                        warn!(%id, %err, "merge failed to insert item");
                        MergeOutcome::Skipped
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_higher_quantity_wins() {
        let mut a = Inventory::new();
        a.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();

        let mut b = Inventory::new();
        b.add_item("1", "Hex Bolt", "Hardware", 70, 99).unwrap();
        b.add_item("2", "Wing Nut", "Hardware", 30, 10).unwrap();

        let report = a.merge(b);

        assert_eq!(a.get_item(&ItemId::new("1")).unwrap().quantity, 70);
        assert_eq!(a.get_item(&ItemId::new("2")).unwrap().quantity, 30);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.inserted(), 1);
        assert_eq!(report.kept(), 0);
        assert_eq!(report.skipped(), 0);
    }

    #[test]
    fn test_merge_tie_keeps_self() {
        let mut a = Inventory::new();
        a.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();

        let mut b = Inventory::new();
        b.add_item("1", "Hex Bolt", "Hardware", 50, 99).unwrap();

        let report = a.merge(b);

        let item = a.get_item(&ItemId::new("1")).unwrap();
        assert_eq!(item.quantity, 50);
        assert_eq!(item.threshold, 10);
        assert_eq!(report.outcome_for(&ItemId::new("1")), Some(MergeOutcome::Kept));
    }

    #[test]
    fn test_merge_lower_quantity_kept() {
        let mut a = Inventory::new();
        a.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();

        let mut b = Inventory::new();
        b.add_item("1", "Hex Bolt", "Hardware", 20, 10).unwrap();

        let report = a.merge(b);

        assert_eq!(a.get_item(&ItemId::new("1")).unwrap().quantity, 50);
        assert_eq!(report.kept(), 1);
    }

    #[test]
    fn test_merge_update_leaves_identity_alone() {
        let mut a = Inventory::new();
        a.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();

        // The incoming record disagrees on everything but the id.
        let mut b = Inventory::new();
        b.add_item("1", "Impostor", "Plumbing", 70, 99).unwrap();

        a.merge(b);

        let item = a.get_item(&ItemId::new("1")).unwrap();
        assert_eq!(item.quantity, 70);
        assert_eq!(item.name, "Hex Bolt");
        assert_eq!(item.category, "Hardware");
        assert_eq!(item.threshold, 10);
        assert!(a.get_category("Plumbing").is_err());
    }

    #[test]
    fn test_merge_creates_new_category() {
        let mut a = Inventory::new();
        a.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();

        let mut b = Inventory::new();
        b.add_item("2", "Pine Board", "Lumber", 25, 8).unwrap();

        a.merge(b);

        let lumber = a.get_category("Lumber").unwrap();
        assert_eq!(lumber.len(), 1);
        assert_eq!(lumber[0].name, "Pine Board");
    }

    #[test]
    fn test_merge_reindexes_quantities() {
        let mut a = Inventory::new();
        a.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();
        a.add_item("2", "Wing Nut", "Hardware", 60, 10).unwrap();

        let mut b = Inventory::new();
        b.add_item("1", "Hex Bolt", "Hardware", 70, 10).unwrap();

        a.merge(b);

        // "1" overtook "2" both globally and within the category.
        let top: Vec<&str> = a.top_k(2).iter().map(|item| item.id.as_str()).collect();
        assert_eq!(top, vec!["1", "2"]);

        let hardware = a.get_category("Hardware").unwrap();
        assert_eq!(hardware[0].id.as_str(), "1");
    }

    #[test]
    fn test_merge_is_not_commutative_on_ties() {
        let mut left = Inventory::new();
        left.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();

        let mut right = Inventory::new();
        right.add_item("1", "Hex Bolt", "Hardware", 50, 99).unwrap();

        let mut forward = left.clone();
        forward.merge(right.clone());
        let mut backward = right;
        backward.merge(left);

        // Quantities agree, but each side kept its own threshold.
        assert_eq!(forward.get_item(&ItemId::new("1")).unwrap().threshold, 10);
        assert_eq!(backward.get_item(&ItemId::new("1")).unwrap().threshold, 99);
    }

    #[test]
    fn test_merge_empty_inventories() {
        let mut a = Inventory::new();
        let report = a.merge(Inventory::new());
        assert!(report.is_empty());

        let mut b = Inventory::new();
        b.add_item("1", "Hex Bolt", "Hardware", 50, 10).unwrap();
        let report = a.merge(b);
        assert_eq!(report.len(), 1);
        assert_eq!(report.inserted(), 1);
        assert_eq!(a.item_count(), 1);
    }
}
