//! Owned-materials ledger.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A material the user already holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedMaterial {
    /// Item name.
    pub item_name: String,
    /// Quantity on hand.
    pub quantity: u64,
}

impl OwnedMaterial {
    /// Creates a new entry.
    #[must_use]
    pub fn new(item_name: impl Into<String>, quantity: u64) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
        }
    }
}

/// Read-only lookup of on-hand quantities.
pub trait StockLookup {
    /// Quantity of `item_name` on hand, 0 if unlisted.
    fn quantity_of(&self, item_name: &str) -> u64;
}

impl StockLookup for HashMap<String, u64> {
    fn quantity_of(&self, item_name: &str) -> u64 {
        self.get(item_name).copied().unwrap_or(0)
    }
}

/// The user's stock, one entry per item name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<OwnedMaterial>", into = "Vec<OwnedMaterial>")]
pub struct OwnedMaterials {
    entries: Vec<OwnedMaterial>,
}

impl OwnedMaterials {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, item_name: &str) -> Option<usize> {
        self.entries.iter().position(|m| m.item_name == item_name)
    }

    /// Adds stock. Repeated additions of the same item accumulate.
    pub fn add(&mut self, item_name: impl Into<String>, quantity: u64) {
        let item_name = item_name.into();
        match self.position(&item_name) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.quantity = entry.quantity.saturating_add(quantity);
                debug!("{} now owned x{}", entry.item_name, entry.quantity);
            },
            None => {
                debug!("{} now owned x{}", item_name, quantity);
                self.entries.push(OwnedMaterial::new(item_name, quantity));
            },
        }
    }

    /// Overwrites the quantity of an existing entry. Returns false if the
    /// item is not in the ledger.
    pub fn set(&mut self, item_name: &str, quantity: u64) -> bool {
        match self.position(item_name) {
            Some(idx) => {
                self.entries[idx].quantity = quantity;
                true
            },
            None => false,
        }
    }

    /// Removes an entry, returning it if present.
    pub fn remove(&mut self, item_name: &str) -> Option<OwnedMaterial> {
        self.position(item_name).map(|idx| self.entries.remove(idx))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Quantity on hand, 0 if absent.
    #[must_use]
    pub fn quantity(&self, item_name: &str) -> u64 {
        self.position(item_name)
            .map_or(0, |idx| self.entries[idx].quantity)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &OwnedMaterial> {
        self.entries.iter()
    }

    /// Number of distinct items held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StockLookup for OwnedMaterials {
    fn quantity_of(&self, item_name: &str) -> u64 {
        self.quantity(item_name)
    }
}

impl FromIterator<OwnedMaterial> for OwnedMaterials {
    fn from_iter<I: IntoIterator<Item = OwnedMaterial>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for material in iter {
            ledger.add(material.item_name, material.quantity);
        }
        ledger
    }
}

impl From<Vec<OwnedMaterial>> for OwnedMaterials {
    fn from(entries: Vec<OwnedMaterial>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<OwnedMaterials> for Vec<OwnedMaterial> {
    fn from(ledger: OwnedMaterials) -> Self {
        ledger.entries
    }
}
