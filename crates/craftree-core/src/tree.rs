//! Crafting dependency tree.
//!
//! A crafting tree is the recursive expansion of a blacksmithing recipe into
//! its ingredients. Ingredients with their own blacksmithing recipe are
//! expanded further; everything else (raw materials, drops, merchant goods,
//! unknown names) becomes a leaf.
//!
//! Cycle detection is path-sensitive: an item may appear in any number of
//! independent branches, and only a back-edge onto the item's own ancestor
//! chain is a cycle. A cyclic node is cut short and carries a single
//! [`TreeNode::CYCLE_SENTINEL`] child.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::recipes::{Recipe, RecipeLookup};

// ============================================================================
// Tree Nodes
// ============================================================================

/// One item in a crafting tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Item this node represents.
    pub item_name: String,
    /// Units needed by the direct parent per unit of the parent.
    pub quantity: u64,
    /// True iff the item has a blacksmithing recipe.
    pub is_crafted: bool,
    /// True on a node whose expansion was cut short by a cycle.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_cyclic: bool,
    /// Ingredients in declared order. Empty unless crafted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Item name of the placeholder child hung under a cyclic node.
    pub const CYCLE_SENTINEL: &'static str = "CYCLE DETECTED!";

    /// Creates a terminal node.
    #[must_use]
    pub fn leaf(item_name: impl Into<String>, quantity: u64) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
            is_crafted: false,
            is_cyclic: false,
            children: Vec::new(),
        }
    }

    /// Creates a crafted node with the given children.
    #[must_use]
    pub fn crafted(item_name: impl Into<String>, quantity: u64, children: Vec<TreeNode>) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
            is_crafted: true,
            is_cyclic: false,
            children,
        }
    }

    /// Creates the node emitted when `item_name` is reached again on its own
    /// ancestor chain.
    #[must_use]
    pub fn cyclic(item_name: impl Into<String>, quantity: u64) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
            is_crafted: true,
            is_cyclic: true,
            children: vec![Self::cycle_sentinel()],
        }
    }

    fn cycle_sentinel() -> Self {
        Self {
            is_cyclic: true,
            ..Self::leaf(Self::CYCLE_SENTINEL, 1)
        }
    }

    /// True for the placeholder child of a cyclic node.
    #[must_use]
    pub fn is_cycle_sentinel(&self) -> bool {
        self.is_cyclic && !self.is_crafted && self.item_name == Self::CYCLE_SENTINEL
    }

    /// Total number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Number of levels in this subtree. A lone leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// True if any node in this subtree is cyclic.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.is_cyclic || self.children.iter().any(Self::has_cycle)
    }

    /// Copy of this subtree where each quantity is a path total: the number
    /// of units needed for `builds` units of the root, multiplied down from
    /// the root. Unlike the built tree, children no longer carry a
    /// per-parent multiplier, so `path_totals(1)` differs from `self` below
    /// the first level. Saturates.
    #[must_use]
    pub fn path_totals(&self, builds: u64) -> TreeNode {
        if self.is_cycle_sentinel() {
            return self.clone();
        }
        let quantity = self.quantity.saturating_mul(builds);
        TreeNode {
            item_name: self.item_name.clone(),
            quantity,
            is_crafted: self.is_crafted,
            is_cyclic: self.is_cyclic,
            children: self.children.iter().map(|c| c.path_totals(quantity)).collect(),
        }
    }

    /// Depth-first pre-order visit of every node with its depth (root = 0).
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&TreeNode, usize),
    {
        self.walk_at(0, visit);
    }

    fn walk_at<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(&TreeNode, usize),
    {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}

// ============================================================================
// Cycles
// ============================================================================

/// Closed loop of item names, first and last equal (`A -> B -> A`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CyclePath(Vec<String>);

impl CyclePath {
    /// Item names along the loop, inclusive on both ends.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.0
    }

    /// Number of distinct steps in the loop (a self-reference has length 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Always false; a recorded cycle has at least one step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item that closes the loop.
    #[must_use]
    pub fn repeated_item(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl From<Vec<String>> for CyclePath {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl fmt::Display for CyclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" -> "))
    }
}

// ============================================================================
// Tree Builder
// ============================================================================

/// Output of [`build_crafting_tree`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTreeResult {
    /// The tree, or `None` if the root is unknown or not crafted.
    pub tree: Option<TreeNode>,
    /// Every cycle met during expansion, in discovery order.
    pub cycles: Vec<CyclePath>,
}

impl BuildTreeResult {
    /// True if no tree was built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }
}

struct TreeBuilder<'a, L: ?Sized> {
    recipes: &'a L,
    /// Items currently being expanded, root first.
    path: Vec<String>,
    cycles: Vec<CyclePath>,
}

impl<'a, L: RecipeLookup + ?Sized> TreeBuilder<'a, L> {
    fn new(recipes: &'a L) -> Self {
        Self {
            recipes,
            path: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn build_node(&mut self, item_name: &str, quantity: u64) -> TreeNode {
        if let Some(start) = self.path.iter().position(|p| p == item_name) {
            let mut loop_items = self.path[start..].to_vec();
            loop_items.push(item_name.to_string());
            let cycle = CyclePath::from(loop_items);
            warn!("Cycle detected in crafting tree: {}", cycle);
            self.cycles.push(cycle);
            return TreeNode::cyclic(item_name, quantity);
        }

        let recipes = self.recipes;
        let Some(ingredients) = recipes.find(item_name).and_then(Recipe::ingredients) else {
            return TreeNode::leaf(item_name, quantity);
        };

        self.path.push(item_name.to_string());
        let children = ingredients
            .iter()
            .map(|ing| self.build_node(&ing.name, u64::from(ing.quantity)))
            .collect();
        self.path.pop();

        TreeNode::crafted(item_name, quantity, children)
    }
}

/// Builds the crafting tree for `root_item_name`.
///
/// Returns an empty result (no tree, no cycles) when the root is missing or
/// is not obtained through blacksmithing. Ingredients with no recipe become
/// leaves. Terminates on any finite recipe set, cyclic or not.
pub fn build_crafting_tree<L>(root_item_name: &str, recipes: &L) -> BuildTreeResult
where
    L: RecipeLookup + ?Sized,
{
    let is_craftable = recipes
        .find(root_item_name)
        .is_some_and(Recipe::is_crafted);
    if !is_craftable {
        warn!(
            "Cannot build crafting tree for '{}': not found or not a blacksmithing recipe",
            root_item_name
        );
        return BuildTreeResult::default();
    }

    let mut builder = TreeBuilder::new(recipes);
    let tree = builder.build_node(root_item_name, 1);
    debug!(
        "Built crafting tree for '{}': {} nodes, depth {}, {} cycles",
        root_item_name,
        tree.node_count(),
        tree.depth(),
        builder.cycles.len()
    );

    BuildTreeResult {
        tree: Some(tree),
        cycles: builder.cycles,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::{Acquisition, ItemType, RecipeBook};
    use proptest::prelude::*;

    fn book(recipes: Vec<Recipe>) -> RecipeBook {
        RecipeBook::from_recipes(recipes).expect("valid book")
    }

    fn sword_book() -> RecipeBook {
        book(vec![
            Recipe::crafted("Sword", [("Bar", 2)]),
            Recipe::crafted("Bar", [("Ore", 3)]),
        ])
    }

    #[test]
    fn test_build_simple_tree() {
        let result = build_crafting_tree("Sword", &sword_book());
        assert!(result.cycles.is_empty());

        let expected = TreeNode::crafted(
            "Sword",
            1,
            vec![TreeNode::crafted("Bar", 2, vec![TreeNode::leaf("Ore", 3)])],
        );
        assert_eq!(result.tree, Some(expected));
    }

    #[test]
    fn test_path_totals_multiply_down_paths() {
        let tree = build_crafting_tree("Sword", &sword_book()).tree.expect("tree");

        let single = tree.path_totals(1);
        assert_eq!(single.quantity, 1);
        assert_eq!(single.children[0].quantity, 2);
        assert_eq!(single.children[0].children[0].quantity, 6);
        assert_ne!(single, tree);

        let doubled = tree.path_totals(2);
        assert_eq!(doubled.quantity, 2);
        assert_eq!(doubled.children[0].quantity, 4);
        assert_eq!(doubled.children[0].children[0].quantity, 12);
    }

    #[test]
    fn test_built_tree_keeps_per_parent_quantities() {
        let tree = build_crafting_tree("Sword", &sword_book()).tree.expect("tree");
        assert_eq!(tree.children[0].quantity, 2);
        assert_eq!(tree.children[0].children[0].quantity, 3);
    }

    #[test]
    fn test_path_totals_keep_sentinel() {
        let tree = TreeNode::crafted("A", 2, vec![TreeNode::cyclic("A", 3)]);
        let totals = tree.path_totals(5);
        let sentinel = &totals.children[0].children[0];
        assert!(sentinel.is_cycle_sentinel());
        assert_eq!(sentinel.quantity, 1);
        assert_eq!(totals.children[0].quantity, 30);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let result = build_crafting_tree("Axe", &sword_book());
        assert!(result.is_empty());
        assert!(result.cycles.is_empty());
    }

    #[test]
    fn test_non_crafted_root_is_empty() {
        let recipes = book(vec![Recipe::new(
            "Ore",
            ItemType::Items,
            Acquisition::Mining {
                mineable_floor: Some(1),
            },
        )]);
        assert_eq!(build_crafting_tree("Ore", &recipes), BuildTreeResult::default());
    }

    #[test]
    fn test_non_blacksmithing_ingredient_is_leaf() {
        let recipes = book(vec![
            Recipe::crafted("Cloak", [("Wolf Pelt", 4)]),
            Recipe::new(
                "Wolf Pelt",
                ItemType::Items,
                Acquisition::MobDrop {
                    mob_sources: Vec::new(),
                },
            ),
        ]);
        let tree = build_crafting_tree("Cloak", &recipes).tree.expect("tree");
        assert_eq!(tree.children, vec![TreeNode::leaf("Wolf Pelt", 4)]);
    }

    #[test]
    fn test_two_item_cycle() {
        let recipes = book(vec![
            Recipe::crafted("A", [("B", 1)]),
            Recipe::crafted("B", [("A", 1)]),
        ]);
        let result = build_crafting_tree("A", &recipes);
        let tree = result.tree.expect("tree");

        assert!(!tree.is_cyclic);
        let b = &tree.children[0];
        assert!(b.is_crafted);
        assert!(!b.is_cyclic);
        let a_again = &b.children[0];
        assert_eq!(a_again.item_name, "A");
        assert!(a_again.is_cyclic);
        assert!(a_again.is_crafted);
        assert_eq!(a_again.children.len(), 1);
        assert!(a_again.children[0].is_cycle_sentinel());

        assert_eq!(
            result.cycles,
            vec![CyclePath::from(vec![
                "A".to_string(),
                "B".to_string(),
                "A".to_string()
            ])]
        );
        assert_eq!(result.cycles[0].to_string(), "A -> B -> A");
    }

    #[test]
    fn test_self_reference() {
        let recipes = book(vec![Recipe::crafted("Loop", [("Loop", 2), ("Ore", 1)])]);
        let result = build_crafting_tree("Loop", &recipes);
        let tree = result.tree.expect("tree");

        assert_eq!(tree.children[0], TreeNode::cyclic("Loop", 2));
        assert_eq!(tree.children[1], TreeNode::leaf("Ore", 1));
        assert_eq!(result.cycles.len(), 1);
        assert_eq!(result.cycles[0].len(), 1);
        assert_eq!(result.cycles[0].repeated_item(), Some("Loop"));
    }

    #[test]
    fn test_cycle_reported_from_first_repeat() {
        // Root -> A -> B -> C -> A: the loop starts at A, not at Root.
        let recipes = book(vec![
            Recipe::crafted("Root", [("A", 1)]),
            Recipe::crafted("A", [("B", 1)]),
            Recipe::crafted("B", [("C", 1)]),
            Recipe::crafted("C", [("A", 1)]),
        ]);
        let result = build_crafting_tree("Root", &recipes);
        let items: Vec<&str> = result.cycles[0].items().iter().map(String::as_str).collect();
        assert_eq!(items, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_shared_ingredient_in_sibling_branches_is_not_a_cycle() {
        let recipes = book(vec![
            Recipe::crafted("Armor", [("Plate", 2), ("Rivet", 8)]),
            Recipe::crafted("Plate", [("Bar", 3)]),
            Recipe::crafted("Rivet", [("Bar", 1)]),
            Recipe::crafted("Bar", [("Ore", 2)]),
        ]);
        let result = build_crafting_tree("Armor", &recipes);
        assert!(result.cycles.is_empty());
        let tree = result.tree.expect("tree");
        assert!(!tree.has_cycle());
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.depth(), 4);
    }

    #[test]
    fn test_children_follow_ingredient_order() {
        let recipes = book(vec![Recipe::crafted("Kit", [("Z", 1), ("A", 2), ("M", 3)])]);
        let tree = build_crafting_tree("Kit", &recipes).tree.expect("tree");
        let names: Vec<&str> = tree.children.iter().map(|c| c.item_name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_slice_lookup_builds_same_tree() {
        let recipes = sword_book();
        assert_eq!(
            build_crafting_tree("Sword", recipes.as_slice()),
            build_crafting_tree("Sword", &recipes)
        );
    }

    #[test]
    fn test_walk_visits_pre_order() {
        let tree = build_crafting_tree("Sword", &sword_book()).tree.expect("tree");
        let mut seen = Vec::new();
        tree.walk(&mut |node, depth| seen.push((node.item_name.clone(), depth)));
        assert_eq!(
            seen,
            vec![
                ("Sword".to_string(), 0),
                ("Bar".to_string(), 1),
                ("Ore".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_tree_json_omits_empty_fields() {
        let json = serde_json::to_value(TreeNode::leaf("Ore", 3)).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"itemName": "Ore", "quantity": 3, "isCrafted": false})
        );
    }

    /// Random recipe sets over a small name pool, so cycles are common.
    fn arb_recipes() -> impl Strategy<Value = Vec<Recipe>> {
        let names = ["A", "B", "C", "D", "E", "F"];
        proptest::collection::vec(
            proptest::collection::vec((0..names.len(), 1u32..5), 1..4),
            names.len(),
        )
        .prop_map(move |all| {
            all.into_iter()
                .enumerate()
                .map(|(i, ings)| {
                    Recipe::crafted(names[i], ings.into_iter().map(|(j, q)| (names[j], q)))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_build_terminates_and_closes_cycles(recipes in arb_recipes()) {
            let result = build_crafting_tree("A", recipes.as_slice());
            prop_assert!(result.tree.is_some());
            for cycle in &result.cycles {
                prop_assert!(cycle.items().len() >= 2);
                prop_assert_eq!(cycle.items().first(), cycle.items().last());
            }
            let tree = result.tree.expect("tree");
            prop_assert_eq!(tree.has_cycle(), !result.cycles.is_empty());
        }

        #[test]
        fn prop_build_is_idempotent(recipes in arb_recipes()) {
            let first = build_crafting_tree("A", recipes.as_slice());
            let second = build_crafting_tree("A", recipes.as_slice());
            prop_assert_eq!(first, second);
        }
    }
}
