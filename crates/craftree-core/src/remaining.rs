//! Remaining-materials resolution.
//!
//! Given a crafting tree, the user's stock and how many units of the root
//! they want, produce the pruned tree of what is still missing. Only raw
//! leaves are checked against stock; a crafted node survives iff one of its
//! children does. Stock is compared per leaf against the full ledger value
//! and is not depleted as the traversal proceeds, so two branches that both
//! use the same material each see the whole stock.

use tracing::debug;

use crate::owned::StockLookup;
use crate::tree::TreeNode;

/// Returns the still-outstanding part of `node` for `desired` units of it,
/// or `None` if current stock already covers everything.
///
/// Quantities in the result are totals for the whole request (not per unit
/// of the parent): a crafted node carries the number of units to craft, a raw
/// leaf the number of units still to gather. Cycle sentinels never appear in
/// the result.
#[must_use]
pub fn resolve_remaining<S>(node: &TreeNode, owned: &S, desired: u64) -> Option<TreeNode>
where
    S: StockLookup + ?Sized,
{
    let remaining = resolve_node(node, owned, desired);
    match &remaining {
        Some(tree) => debug!(
            "{} x{}: {} nodes still outstanding",
            node.item_name,
            desired,
            tree.node_count()
        ),
        None => debug!("{} x{}: fully covered by stock", node.item_name, desired),
    }
    remaining
}

fn resolve_node<S>(node: &TreeNode, owned: &S, multiplier: u64) -> Option<TreeNode>
where
    S: StockLookup + ?Sized,
{
    if node.is_cycle_sentinel() {
        return None;
    }

    let total_required = node.quantity.saturating_mul(multiplier);

    if !node.is_crafted {
        let remaining = total_required.saturating_sub(owned.quantity_of(&node.item_name));
        if remaining == 0 {
            return None;
        }
        return Some(TreeNode {
            item_name: node.item_name.clone(),
            quantity: remaining,
            is_crafted: false,
            is_cyclic: node.is_cyclic,
            children: Vec::new(),
        });
    }

    let children: Vec<TreeNode> = node
        .children
        .iter()
        .filter_map(|child| resolve_node(child, owned, total_required))
        .collect();

    if children.is_empty() {
        return None;
    }

    Some(TreeNode {
        item_name: node.item_name.clone(),
        quantity: total_required,
        is_crafted: true,
        is_cyclic: node.is_cyclic,
        children,
    })
}
