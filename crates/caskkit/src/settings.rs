//! Provider settings and the environment handed to `brew`.
//!
//! Settings are resolved once and never change afterwards. Anything that
//! depends on filesystem state (which caskroom exists) is probed per call.
//!
//! # Environment Variables
//!
//! - `HOMEBREW_ROOT` - Homebrew installation root
//! - `HOMEBREW_PREFIX` - Used when `HOMEBREW_ROOT` is not set
//! - `BREWCASK_USER` - Operating user override (see [`crate::user`])

use crate::caskroom::LEGACY_CASKROOM;
use crate::user;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Environment variable for the Homebrew root
pub const ENV_HOMEBREW_ROOT: &str = "HOMEBREW_ROOT";

/// Homebrew's own prefix variable, consulted second
pub const ENV_HOMEBREW_PREFIX: &str = "HOMEBREW_PREFIX";

/// Homebrew root when nothing else is configured
pub const DEFAULT_HOMEBREW_ROOT: &str = "/opt/homebrew";

/// Tap that cask tokens are qualified with on install
pub const DEFAULT_TAP: &str = "homebrew/cask";

/// Directory the ask-pass script is written to
pub const DEFAULT_ASKPASS_DIR: &str = "/tmp";

/// System directories appended to `PATH` after `<homebrew_root>/bin`
const SYSTEM_PATH: &str = "/usr/bin:/usr/sbin:/bin:/sbin";

/// Immutable configuration for [`crate::BrewCask`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Homebrew installation root; `<root>/Caskroom` and `<root>/bin` live here
    pub homebrew_root: PathBuf,
    /// Caskroom of old standalone brew-cask installs, preferred when present
    pub legacy_caskroom: PathBuf,
    /// Tap prefix for install, e.g. `homebrew/cask`
    pub tap: String,
    /// Program used to run Homebrew
    pub brew_command: String,
    /// User casks are installed for
    pub user: String,
    /// Where the ask-pass script is created
    pub askpass_dir: PathBuf,
}

impl ProviderSettings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self {
            homebrew_root: homebrew_root_from_env(),
            legacy_caskroom: PathBuf::from(LEGACY_CASKROOM),
            tap: DEFAULT_TAP.to_string(),
            brew_command: "brew".to_string(),
            user: user::default_user(None),
            askpass_dir: PathBuf::from(DEFAULT_ASKPASS_DIR),
        }
    }

    /// Home directory handed to `brew`: always `/Users/<user>`, root included.
    pub fn user_home(&self) -> PathBuf {
        PathBuf::from("/Users").join(&self.user)
    }

    /// The complete environment for `brew` invocations.
    ///
    /// Child processes get exactly this map and nothing inherited, so a
    /// caller's Ruby/Bundler or Homebrew developer variables never leak into
    /// the install.
    pub fn command_environment(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert(
            "HOME".to_string(),
            self.user_home().to_string_lossy().into_owned(),
        );
        env.insert(
            "PATH".to_string(),
            format!("{}/bin:{SYSTEM_PATH}", self.homebrew_root.display()),
        );
        env.insert("HOMEBREW_NO_EMOJI".to_string(), "Yes".to_string());
        env
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Homebrew root from `HOMEBREW_ROOT`, then `HOMEBREW_PREFIX`, then the default.
pub fn homebrew_root_from_env() -> PathBuf {
    [ENV_HOMEBREW_ROOT, ENV_HOMEBREW_PREFIX]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .map_or_else(|| PathBuf::from(DEFAULT_HOMEBREW_ROOT), PathBuf::from)
}
