//! # Craftree Core
//!
//! Recipe data model and the crafting-dependency resolution engine.
//!
//! This crate provides:
//! - Recipes and acquisition methods, and the `RecipeBook` repository
//! - The owned-materials ledger
//! - Crafting tree construction with path-sensitive cycle detection
//! - Raw-material totals across a tree
//! - Remaining-materials resolution against current stock
//!
//! The three tree operations are pure: they never mutate their inputs and
//! always return a value.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod owned;
pub mod recipes;
pub mod remaining;
pub mod totals;
pub mod tree;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::owned::*;
    pub use crate::recipes::*;
    pub use crate::remaining::*;
    pub use crate::totals::*;
    pub use crate::tree::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_sword() {
        let book = RecipeBook::from_recipes(vec![
            Recipe::new(
                "Sword",
                ItemType::OneHanded,
                Acquisition::blacksmithing([("Bar", 2)]),
            ),
            Recipe::crafted("Bar", [("Ore", 3)]),
            Recipe::new(
                "Ore",
                ItemType::Items,
                Acquisition::Mining {
                    mineable_floor: None,
                },
            ),
        ])
        .expect("valid book");

        let result = build_crafting_tree("Sword", &book);
        assert!(result.cycles.is_empty());
        let tree = result.tree.expect("tree");

        let totals = aggregate_raw_materials(&tree);
        assert_eq!(totals.get("Ore"), Some(&6));

        let mut owned = OwnedMaterials::new();
        owned.add("Ore", 4);
        let remaining = resolve_remaining(&tree, &owned, 2).expect("still short");
        assert_eq!(remaining.quantity, 2);
        assert_eq!(remaining.children[0].quantity, 4);
        assert_eq!(remaining.children[0].children[0].quantity, 8);

        owned.add("Ore", 8);
        assert_eq!(resolve_remaining(&tree, &owned, 2), None);
    }
}
