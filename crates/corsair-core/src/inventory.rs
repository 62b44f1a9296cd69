//! Quantity-tracked item containers shared by locations and the player.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One stack of identical items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Short description shown in listings.
    pub description: String,
    /// Weight of a single unit, in kilograms.
    pub weight: f64,
    /// Number of units held. Never zero while stored.
    pub quantity: u32,
}

impl ItemEntry {
    /// Create an entry.
    pub fn new(description: impl Into<String>, weight: f64, quantity: u32) -> Self {
        Self {
            description: description.into(),
            weight: weight.max(0.0),
            quantity,
        }
    }
}

/// An ordered mapping from item name to [`ItemEntry`].
///
/// Iteration follows insertion order. Entries whose quantity drops to zero
/// are removed, never kept around empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    entries: Vec<(String, ItemEntry)>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Get the entry for an item.
    pub fn get(&self, name: &str) -> Option<&ItemEntry> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    /// Quantity held of an item (0 when absent).
    pub fn quantity(&self, name: &str) -> u32 {
        self.get(name).map_or(0, |e| e.quantity)
    }

    /// Check if the item is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Add `quantity` units, creating the entry with the given description
    /// and weight if the item is new. Existing entries keep their metadata;
    /// their quantity saturates at `u32::MAX`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        weight: f64,
        quantity: u32,
    ) {
        if quantity == 0 {
            return;
        }
        let name = name.into();
        match self.position(&name) {
            Some(i) => {
                let entry = &mut self.entries[i].1;
                entry.quantity = entry.quantity.saturating_add(quantity);
            }
            None => self
                .entries
                .push((name, ItemEntry::new(description, weight, quantity))),
        }
    }

    /// Remove `quantity` units. Fails without touching anything when the
    /// item is missing or short.
    pub fn remove(&mut self, name: &str, quantity: u32) -> CoreResult<ItemEntry> {
        let i = self
            .position(name)
            .ok_or_else(|| CoreError::ItemNotCarried(name.to_string()))?;
        let available = self.entries[i].1.quantity;
        if available < quantity {
            return Err(CoreError::NotEnough {
                item: name.to_string(),
                needed: quantity,
                available,
            });
        }

        let mut taken = self.entries[i].1.clone();
        taken.quantity = quantity;
        if available == quantity {
            self.entries.remove(i);
        } else {
            self.entries[i].1.quantity -= quantity;
        }
        Ok(taken)
    }

    /// Move one unit of `name` from `from` into `to`.
    ///
    /// The source entry is decremented (and deleted at zero); the
    /// destination entry is incremented, or created with the source's
    /// description and weight. Take and drop both go through here.
    pub fn transfer_one(from: &mut Inventory, to: &mut Inventory, name: &str) -> CoreResult<()> {
        let unit = from.remove(name, 1)?;
        to.add(name, unit.description, unit.weight, 1);
        Ok(())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the inventory holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Combined weight of every unit held.
    pub fn total_weight(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, e)| e.weight * f64::from(e.quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tavern() -> Inventory {
        let mut inv = Inventory::new();
        inv.add("pièce", "une pièce d'or", 0.1, 10);
        inv
    }

    #[test]
    fn add_merges_existing_entries() {
        let mut inv = tavern();
        inv.add("pièce", "ignored", 9.0, 5);
        assert_eq!(inv.quantity("pièce"), 15);
        assert_eq!(inv.get("pièce").unwrap().description, "une pièce d'or");
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn add_zero_is_noop() {
        let mut inv = Inventory::new();
        inv.add("tortue", "une tortue rare", 1.0, 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_last_unit_deletes_entry() {
        let mut inv = Inventory::new();
        inv.add("tortue", "une tortue rare", 1.0, 1);
        let taken = inv.remove("tortue", 1).unwrap();
        assert_eq!(taken.quantity, 1);
        assert!(!inv.contains("tortue"));
    }

    #[test]
    fn remove_more_than_held_fails_untouched() {
        let mut inv = tavern();
        let err = inv.remove("pièce", 11).unwrap_err();
        assert!(matches!(err, CoreError::NotEnough { available: 10, .. }));
        assert_eq!(inv.quantity("pièce"), 10);
    }

    #[test]
    fn remove_missing_item_fails() {
        let mut inv = Inventory::new();
        assert_eq!(
            inv.remove("tortue", 1),
            Err(CoreError::ItemNotCarried("tortue".into()))
        );
    }

    #[test]
    fn transfer_copies_metadata_on_creation() {
        let mut room = tavern();
        let mut player = Inventory::new();
        Inventory::transfer_one(&mut room, &mut player, "pièce").unwrap();

        assert_eq!(room.quantity("pièce"), 9);
        let entry = player.get("pièce").unwrap();
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.description, "une pièce d'or");
        assert!((entry.weight - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut inv = Inventory::new();
        inv.add("b", "", 0.0, 1);
        inv.add("a", "", 0.0, 1);
        inv.add("c", "", 0.0, 1);
        let names: Vec<_> = inv.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn total_weight_counts_units() {
        let mut inv = Inventory::new();
        inv.add("tortue", "", 1.0, 2);
        inv.add("pièce", "", 0.5, 4);
        assert!((inv.total_weight() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quantity_saturates_instead_of_overflowing() {
        let mut room = Inventory::new();
        room.add("pièce", "une pièce d'or", 0.1, u32::MAX);
        let mut player = Inventory::new();
        player.add("pièce", "une pièce d'or", 0.1, 1);

        Inventory::transfer_one(&mut player, &mut room, "pièce").unwrap();
        assert_eq!(room.quantity("pièce"), u32::MAX);
        assert!(!player.contains("pièce"));
    }

    proptest! {
        #[test]
        fn take_then_drop_restores_both_sides(
            qty in 1u32..50,
            held in 0u32..5,
            weight in 0.0f64..20.0,
        ) {
            let mut room = Inventory::new();
            room.add("lanterne", "une vieille lanterne", weight, qty);
            room.add("corde", "une corde", 2.0, 3);
            let mut player = Inventory::new();
            player.add("lanterne", "une vieille lanterne", weight, held);

            let room_before = room.clone();
            let player_before = player.clone();

            Inventory::transfer_one(&mut room, &mut player, "lanterne").unwrap();
            Inventory::transfer_one(&mut player, &mut room, "lanterne").unwrap();

            prop_assert_eq!(room.quantity("lanterne"), room_before.quantity("lanterne"));
            prop_assert_eq!(player.quantity("lanterne"), player_before.quantity("lanterne"));
            prop_assert_eq!(room.get("lanterne"), room_before.get("lanterne"));
            prop_assert_eq!(player.get("lanterne"), player_before.get("lanterne"));
            prop_assert_eq!(room.quantity("corde"), 3);
        }
    }
}
