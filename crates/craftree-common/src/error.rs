//! Error types for Craftree.

use thiserror::Error;

/// Top-level error type for Craftree file and repository operations.
#[derive(Debug, Error)]
pub enum CraftreeError {
    /// Recipe repository errors
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML (de)serialization errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// Well-formed input that does not describe valid data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

impl From<toml::de::Error> for CraftreeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for CraftreeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

/// Recipe repository and validation errors.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// A recipe with this item name already exists
    #[error("Recipe already exists: {0}")]
    Duplicate(String),

    /// No recipe with this item name
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// Recipe failed validation
    #[error("Invalid recipe '{item}': {reason}")]
    Invalid {
        /// Item name of the offending recipe
        item: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type alias for Craftree operations.
pub type CraftreeResult<T> = Result<T, CraftreeError>;

/// Result type alias for recipe repository operations.
pub type RecipeResult<T> = Result<T, RecipeError>;
