//! Resolve the effective configuration from `canon.toml` and flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use canon_map::{CanonConfig, Workspace};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "canon.toml";

/// Load `config_path` (defaults when missing) and apply flag overrides.
pub fn load_config(config_path: &Path, mappings_dir: Option<PathBuf>) -> Result<CanonConfig> {
    let mut config = CanonConfig::load(config_path)
        .with_context(|| format!("load configuration {}", config_path.display()))?;
    if let Some(dir) = mappings_dir {
        config.mappings_dir = dir;
    }
    tracing::debug!(mappings_dir = %config.mappings_dir.display(), "configuration resolved");
    Ok(config)
}

/// Open the workspace described by the configuration.
pub fn open_workspace(config_path: &Path, mappings_dir: Option<PathBuf>) -> Result<Workspace> {
    let config = load_config(config_path, mappings_dir)?;
    let dir = config.mappings_dir.clone();
    Workspace::open(config).with_context(|| format!("open mappings directory {}", dir.display()))
}
