//! Workspace persistence and recipe import/export.
//!
//! This module provides:
//! - `Workspace`: the recipe book plus the owned-materials ledger
//! - `WorkspaceStore`: JSON persistence with atomic writes (temp file + rename)
//! - Import and export of bare recipe arrays

use craftree_common::{CraftreeError, CraftreeResult, SchemaVersion};
use craftree_core::{OwnedMaterials, Recipe, RecipeBook};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// On-disk shape of a workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDocument {
    /// Document format version.
    #[serde(default)]
    pub version: SchemaVersion,
    /// All recipes, in user order.
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    /// Materials on hand.
    #[serde(default)]
    pub owned_materials: OwnedMaterials,
}

/// Everything the user has entered.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    /// Recipe repository.
    pub recipes: RecipeBook,
    /// Owned-materials ledger.
    pub owned: OwnedMaterials,
}

impl Workspace {
    /// Builds a workspace from a document, validating every recipe.
    pub fn from_document(doc: WorkspaceDocument) -> CraftreeResult<Self> {
        let current = SchemaVersion::WORKSPACE_FILE;
        if !current.can_read(&doc.version) {
            return Err(CraftreeError::VersionMismatch {
                expected: current.to_string(),
                actual: doc.version.to_string(),
            });
        }

        Ok(Self {
            recipes: RecipeBook::from_recipes(doc.recipes)?,
            owned: doc.owned_materials,
        })
    }

    /// Snapshot for writing.
    #[must_use]
    pub fn to_document(&self) -> WorkspaceDocument {
        WorkspaceDocument {
            version: SchemaVersion::WORKSPACE_FILE,
            recipes: self.recipes.as_slice().to_vec(),
            owned_materials: self.owned.clone(),
        }
    }
}

/// Reads and writes the workspace document.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    path: PathBuf,
}

impl WorkspaceStore {
    /// Creates a store for the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        temp_path_for(&self.path)
    }

    /// Loads the workspace. A missing document is an empty workspace.
    pub fn load(&self) -> CraftreeResult<Workspace> {
        if !self.path.exists() {
            info!("No workspace at {}, starting empty", self.path.display());
            return Ok(Workspace::default());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let doc: WorkspaceDocument = serde_json::from_reader(reader)?;
        let workspace = Workspace::from_document(doc)?;

        debug!(
            "Loaded workspace: {} recipes, {} owned materials",
            workspace.recipes.len(),
            workspace.owned.len()
        );
        Ok(workspace)
    }

    /// Saves the workspace atomically.
    pub fn save(&self, workspace: &Workspace) -> CraftreeResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        write_json_atomic(&self.path, &workspace.to_document())?;
        debug!("Saved workspace to {}", self.path.display());
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

fn write_json(path: &Path, value: &impl Serialize) -> CraftreeResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Writes `value` as pretty JSON to a sibling temp file, then renames it over
/// `path`. The temp file never outlives a failed write.
fn write_json_atomic(path: &Path, value: &impl Serialize) -> CraftreeResult<()> {
    let temp_path = temp_path_for(path);

    let result = write_json(&temp_path, value)
        .and_then(|()| fs::rename(&temp_path, path).map_err(CraftreeError::Io));
    if let Err(e) = &result {
        let _ = fs::remove_file(&temp_path);
        warn!("Failed to write {}: {e}", path.display());
    }
    result
}

/// Parses a bare JSON array of recipes, validating every entry and rejecting
/// duplicate item names.
pub fn parse_recipes(json: &str) -> CraftreeResult<Vec<Recipe>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(CraftreeError::InvalidData(
            "imported file is not a JSON array".to_string(),
        ));
    };

    let recipes = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            serde_json::from_value::<Recipe>(entry)
                .map_err(|e| CraftreeError::InvalidData(format!("entry {i}: {e}")))
        })
        .collect::<CraftreeResult<Vec<_>>>()?;

    // Round through a book for validation and the uniqueness check.
    Ok(RecipeBook::from_recipes(recipes)?.into_recipes())
}

/// Reads recipes from a JSON file.
pub fn import_recipes(path: &Path) -> CraftreeResult<Vec<Recipe>> {
    let json = fs::read_to_string(path)?;
    let recipes = parse_recipes(&json)?;
    info!("Imported {} recipes from {}", recipes.len(), path.display());
    Ok(recipes)
}

/// Writes the recipe book as a pretty JSON array.
pub fn export_recipes(book: &RecipeBook, path: &Path) -> CraftreeResult<()> {
    write_json(path, &book.as_slice())?;
    info!("Exported {} recipes to {}", book.len(), path.display());
    Ok(())
}
