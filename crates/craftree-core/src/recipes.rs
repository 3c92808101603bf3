//! Recipe definitions and the recipe repository.
//!
//! This module provides:
//! - Recipe data structures keyed by item name
//! - Acquisition methods (blacksmithing, mob drops, merchants, mining, quests)
//! - Recipe validation
//! - The `RecipeBook` repository with name lookup, search and filtering

use ahash::AHashMap;
use craftree_common::{RecipeError, RecipeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

// ============================================================================
// Item Types
// ============================================================================

/// Item categories. Used for filtering only; the tree logic ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemType {
    /// Generic items and materials.
    #[default]
    Items,
    /// One-handed weapons.
    #[serde(rename = "One Handed")]
    OneHanded,
    /// Two-handed weapons.
    #[serde(rename = "Two Handed")]
    TwoHanded,
    /// Rapiers.
    Rapier,
    /// Daggers.
    Dagger,
    /// Lower headwear.
    #[serde(rename = "Lower Headwear")]
    LowerHeadwear,
    /// Upper headwear.
    #[serde(rename = "Upper Headwear")]
    UpperHeadwear,
    /// Body armor.
    Armor,
    /// Shields.
    Shields,
    /// Cosmetic overlays.
    Overlay,
}

impl ItemType {
    /// Get display name for this item type.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Items => "Items",
            Self::OneHanded => "One Handed",
            Self::TwoHanded => "Two Handed",
            Self::Rapier => "Rapier",
            Self::Dagger => "Dagger",
            Self::LowerHeadwear => "Lower Headwear",
            Self::UpperHeadwear => "Upper Headwear",
            Self::Armor => "Armor",
            Self::Shields => "Shields",
            Self::Overlay => "Overlay",
        }
    }

    /// Look up an item type by display name, ignoring case.
    #[must_use]
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.display_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Get all item types.
    #[must_use]
    pub fn all() -> &'static [ItemType] {
        &[
            Self::Items,
            Self::OneHanded,
            Self::TwoHanded,
            Self::Rapier,
            Self::Dagger,
            Self::LowerHeadwear,
            Self::UpperHeadwear,
            Self::Armor,
            Self::Shields,
            Self::Overlay,
        ]
    }
}

// ============================================================================
// Acquisition Methods
// ============================================================================

/// An ingredient requirement for a blacksmithing recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Item name of the ingredient.
    pub name: String,
    /// Quantity required to craft one unit of the parent item.
    pub quantity: u32,
}

impl Ingredient {
    /// Create a new ingredient requirement.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Rank of a mob that drops an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobType {
    /// Floor boss.
    Boss,
    /// Mini boss.
    Miniboss,
    /// Regular mob.
    Minion,
}

/// A mob that drops an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobSource {
    /// Mob name.
    pub mob_name: String,
    /// Mob rank.
    pub mob_type: MobType,
    /// Floor the mob is found on.
    pub floor: u32,
}

/// Discriminant of an [`Acquisition`], for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionKind {
    /// Crafted from ingredients.
    Blacksmithing,
    /// Dropped by mobs.
    MobDrop,
    /// Bought from a merchant.
    Merchant,
    /// Mined.
    Mining,
    /// Awarded by a quest.
    QuestRewards,
}

impl AcquisitionKind {
    /// Wire name of this kind, as used in the `type` tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blacksmithing => "blacksmithing",
            Self::MobDrop => "mob-drop",
            Self::Merchant => "merchant",
            Self::Mining => "mining",
            Self::QuestRewards => "quest-rewards",
        }
    }
}

/// How an item is obtained. Only blacksmithing has recursive structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Acquisition {
    /// Crafted at the forge from other items.
    #[serde(rename_all = "camelCase")]
    Blacksmithing {
        /// Ingredients in declared order.
        ingredients: Vec<Ingredient>,
        /// Smithing skill level needed, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        smithing_skill_required: Option<u32>,
    },
    /// Dropped by one or more mobs.
    #[serde(rename_all = "camelCase")]
    MobDrop {
        /// Mobs that drop the item.
        #[serde(default)]
        mob_sources: Vec<MobSource>,
    },
    /// Sold by a merchant.
    #[serde(rename_all = "camelCase")]
    Merchant {
        /// Price in Col.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item_worth_col: Option<u64>,
        /// Floor the merchant is on.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        merchant_floor: Option<u32>,
    },
    /// Mined from ore veins.
    #[serde(rename_all = "camelCase")]
    Mining {
        /// Floor the item can be mined on.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mineable_floor: Option<u32>,
    },
    /// Given as a quest reward.
    #[serde(rename_all = "camelCase")]
    QuestRewards {
        /// Quest name.
        quest_name: String,
        /// Floor the quest is on.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quest_floor: Option<u32>,
    },
}

impl Acquisition {
    /// Blacksmithing acquisition from `(name, quantity)` pairs.
    #[must_use]
    pub fn blacksmithing<N: Into<String>>(ingredients: impl IntoIterator<Item = (N, u32)>) -> Self {
        Self::Blacksmithing {
            ingredients: ingredients
                .into_iter()
                .map(|(name, quantity)| Ingredient::new(name, quantity))
                .collect(),
            smithing_skill_required: None,
        }
    }

    /// Discriminant of this acquisition.
    #[must_use]
    pub fn kind(&self) -> AcquisitionKind {
        match self {
            Self::Blacksmithing { .. } => AcquisitionKind::Blacksmithing,
            Self::MobDrop { .. } => AcquisitionKind::MobDrop,
            Self::Merchant { .. } => AcquisitionKind::Merchant,
            Self::Mining { .. } => AcquisitionKind::Mining,
            Self::QuestRewards { .. } => AcquisitionKind::QuestRewards,
        }
    }

    /// Ingredients, if this is a blacksmithing acquisition.
    #[must_use]
    pub fn ingredients(&self) -> Option<&[Ingredient]> {
        match self {
            Self::Blacksmithing { ingredients, .. } => Some(ingredients),
            _ => None,
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// A named item and how it is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique item name. Primary key across the system.
    pub item_name: String,
    /// Item category.
    pub item_type: ItemType,
    /// Acquisition method.
    pub acquisition: Acquisition,
}

impl Recipe {
    /// Create a new recipe.
    #[must_use]
    pub fn new(item_name: impl Into<String>, item_type: ItemType, acquisition: Acquisition) -> Self {
        Self {
            item_name: item_name.into(),
            item_type,
            acquisition,
        }
    }

    /// Shorthand for a blacksmithing recipe of type `Items`.
    #[must_use]
    pub fn crafted<N: Into<String>>(
        item_name: impl Into<String>,
        ingredients: impl IntoIterator<Item = (N, u32)>,
    ) -> Self {
        Self::new(item_name, ItemType::Items, Acquisition::blacksmithing(ingredients))
    }

    /// True if this recipe is crafted from ingredients.
    #[must_use]
    pub fn is_crafted(&self) -> bool {
        matches!(self.acquisition, Acquisition::Blacksmithing { .. })
    }

    /// Ingredients, if crafted.
    #[must_use]
    pub fn ingredients(&self) -> Option<&[Ingredient]> {
        self.acquisition.ingredients()
    }

    /// Case-insensitive match on the item name or any ingredient name.
    #[must_use]
    pub fn matches_search(&self, search: &str) -> bool {
        let search = search.to_lowercase();
        self.item_name.to_lowercase().contains(&search)
            || self
                .ingredients()
                .is_some_and(|ings| ings.iter().any(|i| i.name.to_lowercase().contains(&search)))
    }

    /// Validates the recipe.
    pub fn validate(&self) -> RecipeResult<()> {
        let invalid = |reason: &str| RecipeError::Invalid {
            item: self.item_name.clone(),
            reason: reason.to_string(),
        };

        if self.item_name.trim().is_empty() {
            return Err(invalid("empty item name"));
        }

        match &self.acquisition {
            Acquisition::Blacksmithing { ingredients, .. } => {
                if ingredients.is_empty() {
                    return Err(invalid("blacksmithing recipe has no ingredients"));
                }
                for (i, ingredient) in ingredients.iter().enumerate() {
                    if ingredient.name.trim().is_empty() {
                        return Err(invalid(&format!("ingredient {i} has empty name")));
                    }
                    if ingredient.quantity == 0 {
                        return Err(invalid(&format!(
                            "ingredient '{}' has zero quantity",
                            ingredient.name
                        )));
                    }
                }
            },
            Acquisition::QuestRewards { quest_name, .. } if quest_name.trim().is_empty() => {
                return Err(invalid("quest reward has empty quest name"));
            },
            _ => {},
        }

        Ok(())
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Read-only lookup of recipes by exact item name.
pub trait RecipeLookup {
    /// Find the recipe for `item_name`.
    fn find(&self, item_name: &str) -> Option<&Recipe>;
}

impl RecipeLookup for [Recipe] {
    fn find(&self, item_name: &str) -> Option<&Recipe> {
        self.iter().find(|r| r.item_name == item_name)
    }
}

impl RecipeLookup for Vec<Recipe> {
    fn find(&self, item_name: &str) -> Option<&Recipe> {
        self.as_slice().find(item_name)
    }
}

// ============================================================================
// Recipe Book
// ============================================================================

/// Ordered recipe collection with a name index.
#[derive(Debug, Default, Clone)]
pub struct RecipeBook {
    /// Recipes in insertion order.
    recipes: Vec<Recipe>,
    /// Position in `recipes` by item name.
    by_name: AHashMap<String, usize>,
}

impl RecipeBook {
    /// Create new empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from a list of recipes, validating each.
    pub fn from_recipes(recipes: Vec<Recipe>) -> RecipeResult<Self> {
        let mut book = Self::new();
        book.replace_all(recipes)?;
        Ok(book)
    }

    fn reindex(&mut self) {
        self.by_name = self
            .recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.item_name.clone(), i))
            .collect();
    }

    /// Add a recipe. Fails if the item name is taken.
    pub fn add(&mut self, recipe: Recipe) -> RecipeResult<()> {
        recipe.validate()?;
        if self.by_name.contains_key(&recipe.item_name) {
            return Err(RecipeError::Duplicate(recipe.item_name));
        }

        debug!("Adding recipe '{}'", recipe.item_name);
        self.by_name.insert(recipe.item_name.clone(), self.recipes.len());
        self.recipes.push(recipe);
        Ok(())
    }

    /// Replace the recipe stored under `item_name`. The replacement may carry a
    /// new name as long as no other recipe uses it.
    pub fn update(&mut self, item_name: &str, recipe: Recipe) -> RecipeResult<()> {
        recipe.validate()?;
        let idx = *self
            .by_name
            .get(item_name)
            .ok_or_else(|| RecipeError::NotFound(item_name.to_string()))?;

        if recipe.item_name != item_name && self.by_name.contains_key(&recipe.item_name) {
            return Err(RecipeError::Duplicate(recipe.item_name));
        }

        debug!("Updating recipe '{}'", item_name);
        self.by_name.remove(item_name);
        self.by_name.insert(recipe.item_name.clone(), idx);
        self.recipes[idx] = recipe;
        Ok(())
    }

    /// Remove a recipe by name.
    pub fn remove(&mut self, item_name: &str) -> RecipeResult<Recipe> {
        let idx = self
            .by_name
            .get(item_name)
            .copied()
            .ok_or_else(|| RecipeError::NotFound(item_name.to_string()))?;

        let removed = self.recipes.remove(idx);
        self.reindex();
        debug!("Removed recipe '{}'", item_name);
        Ok(removed)
    }

    /// Remove every recipe whose name is in `item_names`. Unknown names are
    /// ignored. Returns how many were removed.
    pub fn remove_many<'a>(&mut self, item_names: impl IntoIterator<Item = &'a str>) -> usize {
        let doomed: BTreeSet<&str> = item_names.into_iter().collect();
        let before = self.recipes.len();
        self.recipes.retain(|r| !doomed.contains(r.item_name.as_str()));
        self.reindex();
        before - self.recipes.len()
    }

    /// Replace the whole collection. Leaves the book untouched on error.
    pub fn replace_all(&mut self, recipes: Vec<Recipe>) -> RecipeResult<()> {
        let mut seen = BTreeSet::new();
        for recipe in &recipes {
            recipe.validate()?;
            if !seen.insert(recipe.item_name.as_str()) {
                return Err(RecipeError::Duplicate(recipe.item_name.clone()));
            }
        }

        self.recipes = recipes;
        self.reindex();
        debug!("Replaced recipe book with {} recipes", self.recipes.len());
        Ok(())
    }

    /// Get recipe by item name.
    #[must_use]
    pub fn get(&self, item_name: &str) -> Option<&Recipe> {
        self.by_name.get(item_name).map(|&i| &self.recipes[i])
    }

    /// Get all recipes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// All recipes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Consume the book, returning its recipes in order.
    #[must_use]
    pub fn into_recipes(self) -> Vec<Recipe> {
        self.recipes
    }

    /// Get recipe count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Search recipes by item or ingredient name.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Recipe> {
        self.filter(|r| r.matches_search(query))
    }

    /// Get recipes of an item type.
    #[must_use]
    pub fn by_item_type(&self, item_type: ItemType) -> Vec<&Recipe> {
        self.filter(|r| r.item_type == item_type)
    }

    /// Get recipes with the given acquisition method.
    #[must_use]
    pub fn by_acquisition(&self, kind: AcquisitionKind) -> Vec<&Recipe> {
        self.filter(|r| r.acquisition.kind() == kind)
    }

    /// Recipes that can root a crafting tree.
    #[must_use]
    pub fn craftable(&self) -> Vec<&Recipe> {
        self.by_acquisition(AcquisitionKind::Blacksmithing)
    }

    /// Ingredient names referenced by some recipe but not defined in the book,
    /// sorted and deduplicated.
    #[must_use]
    pub fn dangling_ingredients(&self) -> Vec<&str> {
        let missing: BTreeSet<&str> = self
            .recipes
            .iter()
            .filter_map(Recipe::ingredients)
            .flatten()
            .map(|i| i.name.as_str())
            .filter(|name| !self.by_name.contains_key(*name))
            .collect();
        missing.into_iter().collect()
    }

    /// Filter recipes by predicate.
    pub fn filter<F>(&self, predicate: F) -> Vec<&Recipe>
    where
        F: Fn(&Recipe) -> bool,
    {
        self.recipes.iter().filter(|r| predicate(r)).collect()
    }
}

impl RecipeLookup for RecipeBook {
    fn find(&self, item_name: &str) -> Option<&Recipe> {
        self.get(item_name)
    }
}

// ============================================================================
// Tests
// ============================================================================
