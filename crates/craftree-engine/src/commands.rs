//! Command parsing and dispatch.

use craftree_common::{CraftreeResult, RecipeError};
use craftree_core::{
    aggregate_raw_materials_for, build_crafting_tree, resolve_remaining, Acquisition, ItemType,
    Recipe,
};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::render::{render_cycles, render_totals, render_tree};
use crate::store::{export_recipes, import_recipes, Workspace};

/// Usage text printed by `help`.
pub const USAGE: &str = "\
usage: craftree <command> [args]

commands:
  tree <item> [-n N]        show the crafting tree (with -n, totals for N builds)
  totals <item> [-n N]      raw materials for N builds
  remaining <item> [-n N]   what is still missing for N builds
  recipes [query] [--type T]
                            list recipes, optionally filtered
  craftable                 list items that can be crafted
  add-recipe <item> [--type T] <ingredient=qty>...
                            add a blacksmithing recipe
  edit-recipe <item> [--type T] [<ingredient=qty>...]
                            change a recipe's type or ingredients
  rename-recipe <item> <new name>
                            rename a recipe
  remove-recipe <item>...   delete one or more recipes
  owned                     list owned materials
  own <item> <qty>          add to owned materials
  set-owned <item> <qty>    overwrite an owned quantity
  disown <item>             remove an owned material
  import <file>             replace all recipes from a JSON array
  export <file>             write all recipes as a JSON array
  help                      show this text";

/// Command-line parse errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Unrecognized command word
    #[error("Unknown command: {0}")]
    Unknown(String),
    /// A required argument is missing
    #[error("Missing argument for '{command}': {argument}")]
    MissingArgument {
        /// Command being parsed
        command: &'static str,
        /// Name of the missing argument
        argument: &'static str,
    },
    /// A numeric argument failed to parse
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    /// Extra arguments after a complete command
    #[error("Unexpected argument: {0}")]
    Unexpected(String),
    /// An ingredient not written as `name=qty`
    #[error("Invalid ingredient '{0}', expected name=qty")]
    InvalidIngredient(String),
    /// No item type has this display name
    #[error("Unknown item type: {0}")]
    UnknownItemType(String),
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the crafting tree.
    Tree {
        /// Root item.
        item: String,
        /// Builds requested (None = per-parent quantities as built).
        quantity: Option<u64>,
    },
    /// Print aggregated raw materials.
    Totals {
        /// Root item.
        item: String,
        /// Builds requested.
        quantity: Option<u64>,
    },
    /// Print what is still needed.
    Remaining {
        /// Root item.
        item: String,
        /// Builds requested.
        quantity: Option<u64>,
    },
    /// List recipes.
    Recipes {
        /// Optional search text.
        query: Option<String>,
        /// Optional item-type filter.
        item_type: Option<ItemType>,
    },
    /// Add a blacksmithing recipe.
    AddRecipe {
        /// Crafted item.
        item: String,
        /// Item category.
        item_type: ItemType,
        /// Ingredient names and per-unit quantities.
        ingredients: Vec<(String, u32)>,
    },
    /// Change a recipe's type or ingredients. Empty `ingredients` keeps the
    /// current acquisition.
    EditRecipe {
        /// Recipe to change.
        item: String,
        /// New item category.
        item_type: Option<ItemType>,
        /// Replacement ingredients.
        ingredients: Vec<(String, u32)>,
    },
    /// Rename a recipe.
    RenameRecipe {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Delete recipes.
    RemoveRecipes {
        /// Names to delete.
        items: Vec<String>,
    },
    /// List craftable recipes.
    Craftable,
    /// List owned materials.
    Owned,
    /// Add owned stock.
    Own {
        /// Item name.
        item: String,
        /// Quantity to add.
        quantity: u64,
    },
    /// Overwrite owned stock.
    SetOwned {
        /// Item name.
        item: String,
        /// New quantity.
        quantity: u64,
    },
    /// Remove owned stock.
    Disown {
        /// Item name.
        item: String,
    },
    /// Replace recipes from a file.
    Import {
        /// Source file.
        path: PathBuf,
    },
    /// Write recipes to a file.
    Export {
        /// Destination file.
        path: PathBuf,
    },
    /// Print usage.
    Help,
}

impl Command {
    /// True if running this command changes the workspace.
    #[must_use]
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Own { .. }
                | Self::SetOwned { .. }
                | Self::Disown { .. }
                | Self::Import { .. }
                | Self::AddRecipe { .. }
                | Self::EditRecipe { .. }
                | Self::RenameRecipe { .. }
                | Self::RemoveRecipes { .. }
        )
    }

    /// Parses arguments (without the program name).
    pub fn parse(args: &[String]) -> Result<Self, CommandError> {
        let Some((word, rest)) = args.split_first() else {
            return Ok(Self::Help);
        };
        let mut rest = rest.iter().map(String::as_str);

        let command = match word.as_str() {
            "tree" => {
                let (item, quantity) = parse_item_and_quantity("tree", &mut rest)?;
                Self::Tree { item, quantity }
            },
            "totals" => {
                let (item, quantity) = parse_item_and_quantity("totals", &mut rest)?;
                Self::Totals { item, quantity }
            },
            "remaining" => {
                let (item, quantity) = parse_item_and_quantity("remaining", &mut rest)?;
                Self::Remaining { item, quantity }
            },
            "recipes" => {
                let mut query = None;
                let mut item_type = None;
                while let Some(arg) = rest.next() {
                    match arg {
                        "--type" | "-t" => {
                            let name = required(&mut rest, "recipes", "type")?;
                            item_type = Some(parse_item_type(&name)?);
                        },
                        _ if query.is_none() => query = Some(arg.to_string()),
                        other => return Err(CommandError::Unexpected(other.to_string())),
                    }
                }
                Self::Recipes { query, item_type }
            },
            "add-recipe" => {
                let item = required(&mut rest, "add-recipe", "item")?;
                let (item_type, ingredients) = parse_recipe_args(&mut rest)?;
                if ingredients.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "add-recipe",
                        argument: "ingredient=qty",
                    });
                }
                Self::AddRecipe {
                    item,
                    item_type: item_type.unwrap_or_default(),
                    ingredients,
                }
            },
            "edit-recipe" => {
                let item = required(&mut rest, "edit-recipe", "item")?;
                let (item_type, ingredients) = parse_recipe_args(&mut rest)?;
                if item_type.is_none() && ingredients.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "edit-recipe",
                        argument: "--type or ingredient=qty",
                    });
                }
                Self::EditRecipe {
                    item,
                    item_type,
                    ingredients,
                }
            },
            "rename-recipe" => Self::RenameRecipe {
                from: required(&mut rest, "rename-recipe", "item")?,
                to: required(&mut rest, "rename-recipe", "new name")?,
            },
            "remove-recipe" => {
                let items: Vec<String> = rest.by_ref().map(str::to_string).collect();
                if items.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "remove-recipe",
                        argument: "item",
                    });
                }
                Self::RemoveRecipes { items }
            },
            "craftable" => Self::Craftable,
            "owned" => Self::Owned,
            "own" => Self::Own {
                item: required(&mut rest, "own", "item")?,
                quantity: parse_number(&required(&mut rest, "own", "qty")?)?,
            },
            "set-owned" => Self::SetOwned {
                item: required(&mut rest, "set-owned", "item")?,
                quantity: parse_number(&required(&mut rest, "set-owned", "qty")?)?,
            },
            "disown" => Self::Disown {
                item: required(&mut rest, "disown", "item")?,
            },
            "import" => Self::Import {
                path: required(&mut rest, "import", "file")?.into(),
            },
            "export" => Self::Export {
                path: required(&mut rest, "export", "file")?.into(),
            },
            "help" | "-h" | "--help" => Self::Help,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        match rest.next() {
            Some(extra) => Err(CommandError::Unexpected(extra.to_string())),
            None => Ok(command),
        }
    }

    /// Runs the command against `workspace`, writing human-readable output.
    pub fn execute<W: Write>(
        &self,
        workspace: &mut Workspace,
        config: &AppConfig,
        out: &mut W,
    ) -> CraftreeResult<()> {
        match self {
            Self::Tree { item, quantity } => {
                let result = build_crafting_tree(item, &workspace.recipes);
                let Some(tree) = result.tree else {
                    writeln!(out, "'{item}' is not a craftable recipe")?;
                    return Ok(());
                };
                // Without -n the per-parent quantities are shown as built.
                let shown = match quantity {
                    Some(builds) => tree.path_totals(*builds),
                    None => tree,
                };
                write!(out, "{}", render_tree(&shown, config.indent_width))?;
                if config.show_cycle_paths {
                    write!(out, "{}", render_cycles(&result.cycles))?;
                }
            },
            Self::Totals { item, quantity } => {
                let Some(tree) = build_crafting_tree(item, &workspace.recipes).tree else {
                    writeln!(out, "'{item}' is not a craftable recipe")?;
                    return Ok(());
                };
                let builds = quantity.unwrap_or(config.default_quantity);
                let totals = aggregate_raw_materials_for(&tree, builds);
                write!(out, "{}", render_totals(&totals))?;
            },
            Self::Remaining { item, quantity } => {
                let Some(tree) = build_crafting_tree(item, &workspace.recipes).tree else {
                    writeln!(out, "'{item}' is not a craftable recipe")?;
                    return Ok(());
                };
                let builds = quantity.unwrap_or(config.default_quantity);
                match resolve_remaining(&tree, &workspace.owned, builds) {
                    Some(remaining) => {
                        write!(out, "{}", render_tree(&remaining, config.indent_width))?;
                    },
                    None => writeln!(out, "nothing left to gather for {item} x{builds}")?,
                }
            },
            Self::Recipes { query, item_type } => {
                let mut recipes: Vec<&Recipe> = match (query, item_type) {
                    (Some(q), _) => workspace.recipes.search(q),
                    (None, Some(t)) => workspace.recipes.by_item_type(*t),
                    (None, None) => workspace.recipes.iter().collect(),
                };
                if let Some(t) = item_type {
                    recipes.retain(|r| r.item_type == *t);
                }
                for recipe in recipes {
                    writeln!(
                        out,
                        "{} ({}, {})",
                        recipe.item_name,
                        recipe.item_type.display_name(),
                        recipe.acquisition.kind().as_str()
                    )?;
                }
            },
            Self::AddRecipe {
                item,
                item_type,
                ingredients,
            } => {
                let acquisition = Acquisition::blacksmithing(ingredients.clone());
                workspace
                    .recipes
                    .add(Recipe::new(item.clone(), *item_type, acquisition))?;
                writeln!(out, "added {item}")?;
            },
            Self::EditRecipe {
                item,
                item_type,
                ingredients,
            } => {
                let existing = workspace
                    .recipes
                    .get(item)
                    .ok_or_else(|| RecipeError::NotFound(item.clone()))?;
                let acquisition = if ingredients.is_empty() {
                    existing.acquisition.clone()
                } else {
                    Acquisition::blacksmithing(ingredients.clone())
                };
                let recipe = Recipe::new(
                    item.clone(),
                    item_type.unwrap_or(existing.item_type),
                    acquisition,
                );
                workspace.recipes.update(item, recipe)?;
                writeln!(out, "updated {item}")?;
            },
            Self::RenameRecipe { from, to } => {
                let existing = workspace
                    .recipes
                    .get(from)
                    .ok_or_else(|| RecipeError::NotFound(from.clone()))?;
                let renamed = Recipe {
                    item_name: to.clone(),
                    ..existing.clone()
                };
                workspace.recipes.update(from, renamed)?;
                writeln!(out, "renamed {from} to {to}")?;
            },
            Self::RemoveRecipes { items } => match items.as_slice() {
                [single] => {
                    workspace.recipes.remove(single)?;
                    writeln!(out, "removed {single}")?;
                },
                _ => {
                    let removed = workspace
                        .recipes
                        .remove_many(items.iter().map(String::as_str));
                    writeln!(out, "removed {removed} recipes")?;
                },
            },
            Self::Craftable => {
                for recipe in workspace.recipes.craftable() {
                    writeln!(out, "{}", recipe.item_name)?;
                }
            },
            Self::Owned => {
                for material in workspace.owned.iter() {
                    writeln!(out, "{} x{}", material.item_name, material.quantity)?;
                }
            },
            Self::Own { item, quantity } => {
                workspace.owned.add(item.clone(), *quantity);
                writeln!(out, "{item} x{}", workspace.owned.quantity(item))?;
            },
            Self::SetOwned { item, quantity } => {
                if workspace.owned.set(item, *quantity) {
                    writeln!(out, "{item} x{quantity}")?;
                } else {
                    writeln!(out, "'{item}' is not owned; use 'own' to add it")?;
                }
            },
            Self::Disown { item } => match workspace.owned.remove(item) {
                Some(_) => writeln!(out, "removed {item}")?,
                None => writeln!(out, "'{item}' is not owned")?,
            },
            Self::Import { path } => {
                let recipes = import_recipes(path)?;
                let count = recipes.len();
                workspace.recipes.replace_all(recipes)?;
                info!("Recipe book replaced from {}", path.display());
                writeln!(out, "imported {count} recipes")?;
            },
            Self::Export { path } => {
                export_recipes(&workspace.recipes, path)?;
                writeln!(out, "exported {} recipes", workspace.recipes.len())?;
            },
            Self::Help => writeln!(out, "{USAGE}")?,
        }
        Ok(())
    }
}

fn required<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    args.next()
        .map(str::to_string)
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn parse_number(text: &str) -> Result<u64, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

fn parse_item_type(text: &str) -> Result<ItemType, CommandError> {
    ItemType::from_display_name(text).ok_or_else(|| CommandError::UnknownItemType(text.to_string()))
}

fn parse_ingredient(text: &str) -> Result<(String, u32), CommandError> {
    let (name, qty) = text
        .rsplit_once('=')
        .ok_or_else(|| CommandError::InvalidIngredient(text.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::InvalidIngredient(text.to_string()));
    }
    let qty = qty
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidNumber(qty.to_string()))?;
    Ok((name.to_string(), qty))
}

/// Parses `[--type T] <ingredient=qty>...` in any order.
fn parse_recipe_args<'a>(
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<(Option<ItemType>, Vec<(String, u32)>), CommandError> {
    let mut item_type = None;
    let mut ingredients = Vec::new();
    while let Some(arg) = args.next() {
        if matches!(arg, "--type" | "-t") {
            item_type = Some(parse_item_type(&required(args, "recipe", "type")?)?);
        } else {
            ingredients.push(parse_ingredient(arg)?);
        }
    }
    Ok((item_type, ingredients))
}

fn parse_item_and_quantity<'a>(
    command: &'static str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<(String, Option<u64>), CommandError> {
    let item = required(args, command, "item")?;
    let quantity = match args.next() {
        Some("-n" | "--quantity") => Some(parse_number(&required(args, command, "N")?)?),
        Some(other) => return Err(CommandError::Unexpected(other.to_string())),
        None => None,
    };
    Ok((item, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftree_common::CraftreeError;
    use tempfile::TempDir;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn run(workspace: &mut Workspace, line: &str) -> String {
        let command = Command::parse(&args(line)).expect("parse");
        let mut out = Vec::new();
        command
            .execute(workspace, &AppConfig::default(), &mut out)
            .expect("execute");
        String::from_utf8(out).expect("utf8")
    }

    fn sword_workspace() -> Workspace {
        let mut workspace = Workspace::default();
        workspace
            .recipes
            .replace_all(vec![
                Recipe::crafted("Sword", [("Bar", 2)]),
                Recipe::crafted("Bar", [("Ore", 3)]),
            ])
            .expect("valid");
        workspace
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse(&args("tree Sword -n 3")),
            Ok(Command::Tree {
                item: "Sword".to_string(),
                quantity: Some(3)
            })
        );
        assert_eq!(
            Command::parse(&args("own Ore 4")),
            Ok(Command::Own {
                item: "Ore".to_string(),
                quantity: 4
            })
        );
        assert_eq!(Command::parse(&[]), Ok(Command::Help));
        assert_eq!(
            Command::parse(&args("recipes")),
            Ok(Command::Recipes {
                query: None,
                item_type: None
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse(&args("forge Sword")),
            Err(CommandError::Unknown("forge".to_string()))
        );
        assert_eq!(
            Command::parse(&args("own Ore")),
            Err(CommandError::MissingArgument {
                command: "own",
                argument: "qty"
            })
        );
        assert_eq!(
            Command::parse(&args("own Ore -3")),
            Err(CommandError::InvalidNumber("-3".to_string()))
        );
        assert_eq!(
            Command::parse(&args("craftable now")),
            Err(CommandError::Unexpected("now".to_string()))
        );
    }

    #[test]
    fn test_item_names_with_spaces_via_single_arg() {
        let parsed = Command::parse(&["totals".to_string(), "Iron Sword".to_string()]);
        assert_eq!(
            parsed,
            Ok(Command::Totals {
                item: "Iron Sword".to_string(),
                quantity: None
            })
        );
    }

    #[test]
    fn test_tree_output() {
        let mut workspace = sword_workspace();
        assert_eq!(
            run(&mut workspace, "tree Sword"),
            "Sword x1 [craft]\n  Bar x2 [craft]\n    Ore x3\n"
        );
        assert_eq!(
            run(&mut workspace, "tree Sword -n 2"),
            "Sword x2 [craft]\n  Bar x4 [craft]\n    Ore x12\n"
        );
        assert_eq!(
            run(&mut workspace, "tree Ore"),
            "'Ore' is not a craftable recipe\n"
        );
    }

    #[test]
    fn test_totals_output() {
        let mut workspace = sword_workspace();
        assert_eq!(run(&mut workspace, "totals Sword -n 2"), "Ore  12\n");
    }

    #[test]
    fn test_remaining_flow() {
        let mut workspace = sword_workspace();
        run(&mut workspace, "own Ore 4");
        assert_eq!(
            run(&mut workspace, "remaining Sword -n 2"),
            "Sword x2 [craft]\n  Bar x4 [craft]\n    Ore x8\n"
        );

        run(&mut workspace, "own Ore 8");
        assert_eq!(
            run(&mut workspace, "remaining Sword -n 2"),
            "nothing left to gather for Sword x2\n"
        );
    }

    #[test]
    fn test_tree_with_builds_shows_path_totals() {
        let mut workspace = sword_workspace();
        assert_eq!(
            run(&mut workspace, "tree Sword -n 1"),
            "Sword x1 [craft]\n  Bar x2 [craft]\n    Ore x6\n"
        );
    }

    #[test]
    fn test_parse_recipe_commands() {
        let parsed = Command::parse(&[
            "add-recipe".to_string(),
            "Iron Sword".to_string(),
            "--type".to_string(),
            "One Handed".to_string(),
            "Iron Bar=2".to_string(),
            "Leather=1".to_string(),
        ]);
        assert_eq!(
            parsed,
            Ok(Command::AddRecipe {
                item: "Iron Sword".to_string(),
                item_type: ItemType::OneHanded,
                ingredients: vec![("Iron Bar".to_string(), 2), ("Leather".to_string(), 1)],
            })
        );
        assert_eq!(
            Command::parse(&args("remove-recipe Sword Bar")),
            Ok(Command::RemoveRecipes {
                items: vec!["Sword".to_string(), "Bar".to_string()]
            })
        );
        assert_eq!(
            Command::parse(&args("recipes ore --type Items")),
            Ok(Command::Recipes {
                query: Some("ore".to_string()),
                item_type: Some(ItemType::Items)
            })
        );
    }

    #[test]
    fn test_parse_recipe_command_errors() {
        assert_eq!(
            Command::parse(&args("add-recipe Sword Bar")),
            Err(CommandError::InvalidIngredient("Bar".to_string()))
        );
        assert_eq!(
            Command::parse(&args("add-recipe Sword Bar=two")),
            Err(CommandError::InvalidNumber("two".to_string()))
        );
        assert_eq!(
            Command::parse(&args("add-recipe Sword --type Bow Bar=2")),
            Err(CommandError::UnknownItemType("Bow".to_string()))
        );
        assert!(matches!(
            Command::parse(&args("add-recipe Sword")),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse(&args("edit-recipe Sword")),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse(&args("remove-recipe")),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_add_and_edit_recipe() {
        let mut workspace = sword_workspace();
        let add = Command::parse(&args("add-recipe Axe Bar=3 Wood=1")).expect("parse");
        assert!(add.mutates());
        assert_eq!(run(&mut workspace, "add-recipe Axe Bar=3 Wood=1"), "added Axe\n");
        assert_eq!(run(&mut workspace, "totals Axe"), "Ore   9\nWood  1\n");

        assert_eq!(run(&mut workspace, "edit-recipe Axe Bar=1"), "updated Axe\n");
        assert_eq!(run(&mut workspace, "totals Axe"), "Ore  3\n");

        run(&mut workspace, "edit-recipe Axe --type Shields");
        let axe = workspace.recipes.get("Axe").expect("axe");
        assert_eq!(axe.item_type, ItemType::Shields);
        assert_eq!(axe.ingredients().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_add_duplicate_recipe_fails() {
        let mut workspace = sword_workspace();
        let command = Command::parse(&args("add-recipe Sword Ore=1")).expect("parse");
        let result = command.execute(&mut workspace, &AppConfig::default(), &mut Vec::<u8>::new());
        assert!(matches!(
            result,
            Err(CraftreeError::Recipe(RecipeError::Duplicate(_)))
        ));
    }

    #[test]
    fn test_rename_recipe() {
        let mut workspace = sword_workspace();
        assert_eq!(
            run(&mut workspace, "rename-recipe Sword Blade"),
            "renamed Sword to Blade\n"
        );
        assert!(workspace.recipes.get("Sword").is_none());
        assert_eq!(run(&mut workspace, "totals Blade"), "Ore  6\n");
    }

    #[test]
    fn test_remove_recipes() {
        let mut workspace = sword_workspace();
        run(&mut workspace, "add-recipe Axe Bar=3");
        assert_eq!(run(&mut workspace, "remove-recipe Axe"), "removed Axe\n");
        assert_eq!(
            run(&mut workspace, "remove-recipe Sword Bar Gem"),
            "removed 2 recipes\n"
        );
        assert!(workspace.recipes.is_empty());

        let command = Command::parse(&args("remove-recipe Axe")).expect("parse");
        let result = command.execute(&mut workspace, &AppConfig::default(), &mut Vec::<u8>::new());
        assert!(matches!(
            result,
            Err(CraftreeError::Recipe(RecipeError::NotFound(_)))
        ));
    }

    #[test]
    fn test_recipes_type_filter() {
        let mut workspace = sword_workspace();
        run(&mut workspace, "add-recipe Buckler --type Shields Bar=4");
        assert_eq!(
            run(&mut workspace, "recipes --type shields"),
            "Buckler (Shields, blacksmithing)\n"
        );
        assert_eq!(
            run(&mut workspace, "recipes bar --type Items"),
            "Sword (Items, blacksmithing)\nBar (Items, blacksmithing)\n"
        );
    }

    #[test]
    fn test_owned_commands() {
        let mut workspace = Workspace::default();
        assert_eq!(run(&mut workspace, "own Wood 2"), "Wood x2\n");
        assert_eq!(run(&mut workspace, "own Wood 3"), "Wood x5\n");
        assert_eq!(run(&mut workspace, "set-owned Wood 1"), "Wood x1\n");
        assert!(run(&mut workspace, "set-owned Gem 1").contains("not owned"));
        assert_eq!(run(&mut workspace, "owned"), "Wood x1\n");
        assert_eq!(run(&mut workspace, "disown Wood"), "removed Wood\n");
        assert!(workspace.owned.is_empty());
    }

    #[test]
    fn test_tree_prints_cycles() {
        let mut workspace = Workspace::default();
        workspace
            .recipes
            .replace_all(vec![
                Recipe::crafted("A", [("B", 1)]),
                Recipe::crafted("B", [("A", 1)]),
            ])
            .expect("valid");
        let output = run(&mut workspace, "tree A");
        assert!(output.contains("A x1 [cycle]"));
        assert!(output.ends_with("cycle: A -> B -> A\n"));
    }

    #[test]
    fn test_import_export_commands() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("recipes.json");
        let path_arg = path.to_string_lossy().to_string();

        let mut source = sword_workspace();
        let command = Command::Export { path: path.clone() };
        let mut out = Vec::new();
        command
            .execute(&mut source, &AppConfig::default(), &mut out)
            .expect("export");

        let mut target = Workspace::default();
        let import = Command::parse(&["import".to_string(), path_arg]).expect("parse");
        assert!(import.mutates());
        let mut out = Vec::new();
        import
            .execute(&mut target, &AppConfig::default(), &mut out)
            .expect("import");

        assert_eq!(String::from_utf8(out).expect("utf8"), "imported 2 recipes\n");
        assert_eq!(target.recipes.as_slice(), source.recipes.as_slice());
    }
}
