//! Raw-material totals for a crafting tree.

use std::collections::BTreeMap;
use tracing::debug;

use crate::tree::TreeNode;

/// Total quantity of each raw material, keyed by item name.
pub type RawTotals = BTreeMap<String, u64>;

/// Sums every raw leaf of `tree` for one build of the root.
///
/// Quantities compound down the tree: a leaf contributes its own quantity
/// times the product of its ancestors' quantities. The same material reached
/// through several branches adds up. Cycle sentinels contribute nothing.
#[must_use]
pub fn aggregate_raw_materials(tree: &TreeNode) -> RawTotals {
    aggregate_raw_materials_for(tree, 1)
}

/// Like [`aggregate_raw_materials`], for `builds` units of the root.
#[must_use]
pub fn aggregate_raw_materials_for(tree: &TreeNode, builds: u64) -> RawTotals {
    let mut totals = RawTotals::new();
    accumulate(tree, builds, &mut totals);
    debug!(
        "Aggregated {} raw materials for {} x{}",
        totals.len(),
        tree.item_name,
        builds
    );
    totals
}

fn accumulate(node: &TreeNode, multiplier: u64, totals: &mut RawTotals) {
    if node.is_cycle_sentinel() {
        return;
    }

    let effective = node.quantity.saturating_mul(multiplier);
    if node.is_crafted {
        for child in &node.children {
            accumulate(child, effective, totals);
        }
    } else {
        let total = totals.entry(node.item_name.clone()).or_insert(0);
        *total = total.saturating_add(effective);
    }
}
