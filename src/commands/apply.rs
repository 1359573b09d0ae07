//! Manifest commands:
//! - `status` - Show installed casks against the manifest
//! - `apply` - Make installed casks match the manifest

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{Ensure, PackageProvider, compute_diffs};
use std::path::Path;
use std::sync::Arc;

use crate::Context;
use crate::config::CaskManifest;
use crate::engine::{self, ApplyOptions, differ};
use crate::paths;
use crate::ui;

/// One manifest entry next to what is on disk
#[derive(Debug, PartialEq, Eq)]
struct StatusRow {
    name: String,
    ensure: Ensure,
    installed: Option<String>,
}

impl StatusRow {
    fn in_sync(&self) -> bool {
        match (&self.ensure, &self.installed) {
            (Ensure::Present, Some(_)) | (Ensure::Absent, None) => true,
            (Ensure::Version(want), Some(have)) => want == have,
            _ => false,
        }
    }
}

fn load_manifest(file: Option<&Path>) -> Result<CaskManifest> {
    let path = paths::manifest_file(file)?;
    log::debug!("Loading manifest {}", path.display());
    CaskManifest::load(&path)
}

fn status_rows(
    manifest: &CaskManifest,
    provider: &dyn PackageProvider,
) -> Result<Vec<StatusRow>> {
    manifest
        .casks
        .iter()
        .map(|entry| {
            let installed = provider.query(&entry.name)?.map(|s| s.version);
            Ok(StatusRow {
                name: entry.name.clone(),
                ensure: entry.ensure.clone(),
                installed,
            })
        })
        .collect()
}

pub fn status(ctx: &Context, file: Option<&Path>) -> Result<()> {
    let manifest = load_manifest(file)?;
    let provider: Arc<dyn PackageProvider> = Arc::new(super::provider()?);

    ui::header("Cask Status");
    if manifest.casks.is_empty() {
        ui::dim("Manifest lists no casks");
        return Ok(());
    }

    for row in status_rows(&manifest, provider.as_ref())? {
        let symbol = if row.in_sync() {
            "✓".green()
        } else {
            "✗".red()
        };
        let installed = row.installed.as_deref().unwrap_or("not installed");
        println!(
            "  {} {:<30} {} {}",
            symbol,
            row.name,
            installed,
            format!("(want: {})", row.ensure).dimmed()
        );
    }

    if ctx.verbose > 0 {
        differ::display_diff(&compute_diffs(&manifest.resources(&provider)));
    }
    Ok(())
}

pub fn apply(ctx: &Context, file: Option<&Path>, dry_run: bool, yes: bool) -> Result<()> {
    let manifest = load_manifest(file)?;
    let provider: Arc<dyn PackageProvider> = Arc::new(super::provider()?);
    let resources = manifest.resources(&provider);

    if !ctx.quiet {
        ui::header("Applying cask manifest");
        ui::kv("Casks", &resources.len().to_string());
    }

    let summary = engine::apply(
        &resources,
        ApplyOptions {
            dry_run,
            yes,
            verbose: ctx.verbose > 0,
        },
    )?;

    if !summary.is_success() {
        bail!("{} casks failed to converge", summary.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::PackageStatus;
    use std::collections::HashMap;

    struct FakeProvider {
        installed: HashMap<String, String>,
    }

    impl FakeProvider {
        fn with(casks: &[(&str, &str)]) -> Self {
            Self {
                installed: casks
                    .iter()
                    .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
                    .collect(),
            }
        }
    }

    impl PackageProvider for FakeProvider {
        fn query(&self, name: &str) -> Result<Option<PackageStatus>> {
            Ok(self.installed.get(name).map(|v| PackageStatus {
                name: name.to_string(),
                version: v.clone(),
            }))
        }

        fn install(&self, _name: &str, _options: &[String]) -> Result<()> {
            Ok(())
        }

        fn uninstall(&self, _name: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_status_rows() {
        let manifest = CaskManifest::parse(
            r#"
[[cask]]
name = "firefox"

[[cask]]
name = "docker"
ensure = "absent"

[[cask]]
name = "iterm2"
ensure = "3.4.19"

[[cask]]
name = "slack"
"#,
        )
        .unwrap();
        let provider = FakeProvider::with(&[
            ("firefox", "119.0"),
            ("docker", "4.25.0"),
            ("iterm2", "3.4.19"),
        ]);

        let rows = status_rows(&manifest, &provider).unwrap();
        let sync: Vec<(&str, bool)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.in_sync()))
            .collect();
        assert_eq!(
            sync,
            vec![
                ("firefox", true),
                ("docker", false),
                ("iterm2", true),
                ("slack", false),
            ]
        );
        assert_eq!(rows[0].installed.as_deref(), Some("119.0"));
        assert_eq!(rows[3].installed, None);
    }

    #[test]
    fn test_version_mismatch_is_out_of_sync() {
        let row = StatusRow {
            name: "iterm2".into(),
            ensure: Ensure::Version("3.4.20".into()),
            installed: Some("3.4.19".into()),
        };
        assert!(!row.in_sync());
    }
}
