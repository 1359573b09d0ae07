//! Caskroom discovery and installed-version lookup.
//!
//! The caskroom holds one directory per cask, each containing one directory
//! per installed version:
//!
//! ```text
//! /opt/homebrew/Caskroom/
//! └── firefox/
//!     ├── 118.0
//!     └── 119.0.1
//! ```
//!
//! Nothing here is cached; every call reads the filesystem again.

use crate::error::Result;
use crate::types::CaskName;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Caskroom used by the old standalone `brew-cask` installs.
pub const LEGACY_CASKROOM: &str = "/opt/homebrew-cask/Caskroom";

/// Pick the caskroom to inspect.
///
/// The legacy location wins whenever it exists, even if the current one
/// (`<homebrew_root>/Caskroom`) exists as well.
pub fn resolve(legacy: &Path, homebrew_root: &Path) -> PathBuf {
    if legacy.exists() {
        log::debug!("Using legacy caskroom: {}", legacy.display());
        legacy.to_path_buf()
    } else {
        homebrew_root.join("Caskroom")
    }
}

/// Return the installed version of `name` under `caskroom`.
///
/// The version is the greatest child name of `<caskroom>/<name>` in plain
/// byte order, so `1.2` sorts after `1.10`. A missing directory, or one
/// without children, means the cask is not installed.
pub fn current_version(caskroom: &Path, name: &CaskName) -> Result<Option<String>> {
    let cask_dir = caskroom.join(name.as_str());
    if !cask_dir.is_dir() {
        log::debug!("No cask directory at {}", cask_dir.display());
        return Ok(None);
    }

    let entries = match fs::read_dir(&cask_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut latest: Option<String> = None;
    for entry in entries {
        let file_name = entry?.file_name().to_string_lossy().into_owned();
        if latest.as_ref().is_none_or(|current| file_name > *current) {
            latest = Some(file_name);
        }
    }

    Ok(latest)
}
