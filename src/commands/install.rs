//! `brewcask install`

use anyhow::{Context as AnyhowContext, Result};
use declarative::PackageStatus;

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, name: &str, options: &[String]) -> Result<()> {
    let casks = super::provider()?;

    if !ctx.quiet {
        ui::info(&format!("Installing {name}..."));
    }
    casks
        .install(name, options)
        .with_context(|| format!("Failed to install {name}"))?;

    if !ctx.quiet {
        let installed = casks.query(name).unwrap_or_else(|e| {
            log::warn!("Installed {name}, but could not read its version: {e}");
            None
        });
        ui::success(&installed_message(name, installed.as_ref()));
    }
    Ok(())
}

/// The install already succeeded; a missing version only shortens the message
fn installed_message(name: &str, installed: Option<&PackageStatus>) -> String {
    match installed {
        Some(status) => format!("Installed {name} {}", status.version),
        None => format!("Installed {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_message_with_version() {
        let status = PackageStatus {
            name: "firefox".into(),
            version: "119.0.1".into(),
        };
        assert_eq!(
            installed_message("firefox", Some(&status)),
            "Installed firefox 119.0.1"
        );
    }

    #[test]
    fn test_installed_message_without_version() {
        assert_eq!(installed_message("firefox", None), "Installed firefox");
    }
}
