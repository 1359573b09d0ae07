//! Centralized path resolution for brewcask
//!
//! # Environment Variables
//!
//! - `BREWCASK_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/brewcask`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `BREWCASK_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/brewcask` (if set)
//! 3. `~/.config/brewcask`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "BREWCASK_CONFIG_DIR";

/// Settings file inside the config directory
pub const SETTINGS_FILE: &str = "config.toml";

/// Default cask manifest inside the config directory
pub const MANIFEST_FILE: &str = "casks.toml";

/// Get the brewcask config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("brewcask");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("brewcask");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Path of `config.toml`
pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(SETTINGS_FILE))
}

/// Manifest to use: the explicit path if given, else `casks.toml` in the config dir
pub fn manifest_file(explicit: Option<&std::path::Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config_dir()?.join(MANIFEST_FILE)),
    }
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
