//! Package provider contract
//!
//! A provider translates the three host operations into whatever the
//! underlying package manager needs. Providers are stateless between calls:
//! every `query` re-reads the system.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Installed state of a package as reported by [`PackageProvider::query`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStatus {
    /// Package name as requested
    pub name: String,
    /// Installed version string
    pub version: String,
}

/// The host-facing provider contract
pub trait PackageProvider: Send + Sync {
    /// Report the installed version of `name`, or `None` when absent
    fn query(&self, name: &str) -> Result<Option<PackageStatus>>;

    /// Install `name`, appending `options` to the package manager invocation
    fn install(&self, name: &str, options: &[String]) -> Result<()>;

    /// Remove `name` without prompting
    fn uninstall(&self, name: &str) -> Result<()>;
}
