//! Plain-text rendering of trees, totals and cycles.

use craftree_core::{CyclePath, RawTotals, TreeNode};
use std::fmt::Write;

/// Renders a tree one node per line, children indented under parents.
/// Cyclic nodes are marked and their sentinel child is not printed.
#[must_use]
pub fn render_tree(tree: &TreeNode, indent_width: usize) -> String {
    let mut out = String::new();
    tree.walk(&mut |node, depth| {
        if node.is_cycle_sentinel() {
            return;
        }
        let pad = " ".repeat(depth * indent_width);
        let marker = match (node.is_cyclic, node.is_crafted) {
            (true, _) => " [cycle]",
            (false, true) => " [craft]",
            (false, false) => "",
        };
        let _ = writeln!(out, "{pad}{} x{}{marker}", node.item_name, node.quantity);
    });
    out
}

/// Renders totals sorted by item name, one `name: quantity` per line.
#[must_use]
pub fn render_totals(totals: &RawTotals) -> String {
    let width = totals.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (name, qty) in totals {
        let _ = writeln!(out, "{name:<width$}  {qty}");
    }
    out
}

/// Renders detected cycles as `A -> B -> A` lines.
#[must_use]
pub fn render_cycles(cycles: &[CyclePath]) -> String {
    let mut out = String::new();
    for cycle in cycles {
        let _ = writeln!(out, "cycle: {cycle}");
    }
    out
}
