//! Package resources converged through a [`PackageProvider`]

use crate::context::ApplyContext;
use crate::provider::PackageProvider;
use crate::resource::Resource;
use crate::types::{ApplyResult, ResourceState};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Desired presence of a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ensure {
    /// Installed, any version
    #[default]
    Present,
    /// Not installed
    Absent,
    /// Installed at exactly this version string
    Version(String),
}

impl From<String> for Ensure {
    fn from(value: String) -> Self {
        match value.trim() {
            "present" | "installed" => Self::Present,
            "absent" | "purged" => Self::Absent,
            other => Self::Version(other.to_string()),
        }
    }
}

impl From<Ensure> for String {
    fn from(value: Ensure) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
            Self::Version(v) => write!(f, "{v}"),
        }
    }
}

/// A package whose presence is managed by a provider
pub struct PackageResource {
    name: String,
    ensure: Ensure,
    install_options: Vec<String>,
    resource_type: &'static str,
    provider: Arc<dyn PackageProvider>,
}

impl PackageResource {
    pub fn new(
        name: impl Into<String>,
        ensure: Ensure,
        resource_type: &'static str,
        provider: Arc<dyn PackageProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            ensure,
            install_options: Vec::new(),
            resource_type,
            provider,
        }
    }

    /// Extra arguments appended to the install invocation
    pub fn with_install_options(mut self, options: Vec<String>) -> Self {
        self.install_options = options;
        self
    }

    pub fn ensure(&self) -> &Ensure {
        &self.ensure
    }

    fn installed_version(&self) -> Result<Option<String>> {
        let status = self
            .provider
            .query(&self.name)
            .with_context(|| format!("Failed to query {}", self.name))?;
        Ok(status.map(|s| s.version))
    }

    fn install(&self) -> Result<()> {
        self.provider
            .install(&self.name, &self.install_options)
            .with_context(|| format!("Failed to install {}", self.name))
    }
}

impl fmt::Debug for PackageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageResource")
            .field("name", &self.name)
            .field("ensure", &self.ensure)
            .field("install_options", &self.install_options)
            .field("resource_type", &self.resource_type)
            .finish_non_exhaustive()
    }
}

impl Resource for PackageResource {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        match &self.ensure {
            Ensure::Present => format!("Install {}", self.name),
            Ensure::Absent => format!("Remove {}", self.name),
            Ensure::Version(v) => format!("Install {} at {}", self.name, v),
        }
    }

    fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    // Version details are only reported when a version is pinned, so that
    // `Present` compares equal to any installed version.
    fn current_state(&self) -> Result<ResourceState> {
        let state = match (self.installed_version()?, &self.ensure) {
            (None, _) => ResourceState::Absent,
            (Some(version), Ensure::Version(_)) => ResourceState::Present {
                details: Some(version),
            },
            (Some(_), _) => ResourceState::Present { details: None },
        };
        Ok(state)
    }

    fn desired_state(&self) -> ResourceState {
        match &self.ensure {
            Ensure::Present => ResourceState::Present { details: None },
            Ensure::Absent => ResourceState::Absent,
            Ensure::Version(v) => ResourceState::Present {
                details: Some(v.clone()),
            },
        }
    }

    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult> {
        if ctx.dry_run {
            return Ok(ApplyResult::Skipped {
                reason: "Dry run".to_string(),
            });
        }

        let installed = self.installed_version()?;

        match (&self.ensure, installed) {
            (Ensure::Absent, None) => Ok(ApplyResult::NoChange),
            (Ensure::Absent, Some(_)) => {
                self.provider
                    .uninstall(&self.name)
                    .with_context(|| format!("Failed to uninstall {}", self.name))?;
                Ok(ApplyResult::Removed)
            }
            (Ensure::Present | Ensure::Version(_), None) => {
                self.install()?;
                Ok(ApplyResult::Created)
            }
            (Ensure::Present, Some(_)) => Ok(ApplyResult::NoChange),
            (Ensure::Version(wanted), Some(current)) if *wanted == current => {
                Ok(ApplyResult::NoChange)
            }
            (Ensure::Version(wanted), Some(current)) => {
                log::info!("{}: installed {current}, wanted {wanted}", self.name);
                self.install()?;
                Ok(ApplyResult::Modified)
            }
        }
    }
}
