//! TOML configuration: provider settings and the cask manifest

use anyhow::{Context, Result, bail};
use caskkit::ProviderSettings;
use declarative::{BoxedResource, Ensure, PackageProvider, PackageResource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::paths;

// ============================================================================
// Settings (config.toml)
// ============================================================================

/// Overrides for [`ProviderSettings`]; every field is optional.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub homebrew_root: Option<String>,
    pub legacy_caskroom: Option<String>,
    pub tap: Option<String>,
    pub brew_command: Option<String>,
    pub user: Option<String>,
    pub askpass_dir: Option<String>,
}

impl SettingsFile {
    /// Load `config.toml` from the config dir, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid {}", path.display()))
    }

    /// Apply these overrides on top of `base`
    pub fn apply_to(&self, mut base: ProviderSettings) -> ProviderSettings {
        if let Some(root) = non_empty(self.homebrew_root.as_deref()) {
            base.homebrew_root = paths::expand(root);
        }
        if let Some(legacy) = non_empty(self.legacy_caskroom.as_deref()) {
            base.legacy_caskroom = paths::expand(legacy);
        }
        if let Some(tap) = non_empty(self.tap.as_deref()) {
            base.tap = tap.to_string();
        }
        if let Some(brew) = non_empty(self.brew_command.as_deref()) {
            base.brew_command = brew.to_string();
        }
        if let Some(user) = non_empty(self.user.as_deref()) {
            base.user = user.to_string();
        }
        if let Some(dir) = non_empty(self.askpass_dir.as_deref()) {
            base.askpass_dir = paths::expand(dir);
        }
        base
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve provider settings: environment defaults, then `config.toml`
pub fn provider_settings() -> Result<ProviderSettings> {
    let file = SettingsFile::load()?;
    Ok(file.apply_to(ProviderSettings::from_env()))
}

// ============================================================================
// Cask Manifest (casks.toml)
// ============================================================================

/// Desired casks, one `[[cask]]` table each
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CaskManifest {
    #[serde(default, rename = "cask")]
    pub casks: Vec<CaskEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CaskEntry {
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    #[serde(default)]
    pub install_options: Vec<String>,
}

impl CaskManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read manifest {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.casks {
            caskkit::CaskName::new(&entry.name)?;
            if !seen.insert(entry.name.as_str()) {
                bail!("Cask '{}' is listed more than once", entry.name);
            }
        }
        Ok(())
    }

    /// One resource per entry, all converged through `provider`
    pub fn resources(&self, provider: &Arc<dyn PackageProvider>) -> Vec<BoxedResource> {
        self.casks
            .iter()
            .map(|entry| {
                Box::new(
                    PackageResource::new(
                        entry.name.clone(),
                        entry.ensure.clone(),
                        caskkit::RESOURCE_TYPE,
                        Arc::clone(provider),
                    )
                    .with_install_options(entry.install_options.clone()),
                ) as BoxedResource
            })
            .collect()
    }
}
