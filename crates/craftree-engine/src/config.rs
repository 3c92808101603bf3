//! Application configuration.
//!
//! Provides where the workspace document lives, the default build quantity,
//! logging and output settings. Configuration can be loaded from and saved
//! to a TOML file.

use craftree_common::CraftreeResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "craftree.toml";

/// Application directory name under the platform config/data roots.
const APP_DIR: &str = "craftree";

/// Application configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // === Storage ===
    /// Directory holding the workspace document (None = platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Workspace document file name
    pub workspace_file: String,

    // === Planning ===
    /// Units of the root item planned when no `-n` is given
    pub default_quantity: u64,

    // === Output ===
    /// Tracing filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Print detected cycle paths under the tree
    pub show_cycle_paths: bool,
    /// Spaces per tree level
    pub indent_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            workspace_file: "workspace.json".to_string(),
            default_quantity: 1,
            log_filter: "craftree=info".to_string(),
            show_cycle_paths: true,
            indent_width: 2,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> CraftreeResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join(APP_DIR).join(CONFIG_FILE),
        )
    }

    /// Full path of the workspace document.
    #[must_use]
    pub fn workspace_path(&self) -> PathBuf {
        let dir = self
            .data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(&self.workspace_file)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.default_quantity = self.default_quantity.max(1);
        self.indent_width = self.indent_width.clamp(1, 8);

        if self.workspace_file.trim().is_empty() {
            self.workspace_file = Self::default().workspace_file;
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = Self::default().log_filter;
        }
    }
}
