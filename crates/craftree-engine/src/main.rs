//! # Craftree
//!
//! Command-line planner for crafting dependencies.
//!
//! Recipes and owned materials live in a single JSON workspace document.
//! Each invocation loads it, runs one command and saves it again if the
//! command changed anything.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::{debug, info};

use craftree_engine::commands::Command;
use craftree_engine::config::AppConfig;
use craftree_engine::logging;
use craftree_engine::store::WorkspaceStore;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing before anything can log
    let log_filter = logging::init();

    let config = AppConfig::load();
    logging::apply_config(&log_filter, &config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    debug!("Parsed command: {command:?}");

    let store = WorkspaceStore::new(config.workspace_path());
    let mut workspace = store
        .load()
        .with_context(|| format!("loading workspace {}", store.path().display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    command.execute(&mut workspace, &config, &mut out)?;
    out.flush()?;

    if command.mutates() {
        store
            .save(&workspace)
            .with_context(|| format!("saving workspace {}", store.path().display()))?;
        info!("Workspace saved");
    }

    Ok(())
}
