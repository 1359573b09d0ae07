//! `brewcask uninstall`

use anyhow::{Context as AnyhowContext, Result};

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, name: &str) -> Result<()> {
    let casks = super::provider()?;

    if casks.query(name)?.is_none() && !ctx.quiet {
        ui::warn(&format!("{name} is not in the caskroom; running uninstall anyway"));
    }

    casks
        .uninstall(name)
        .with_context(|| format!("Failed to uninstall {name}"))?;

    if !ctx.quiet {
        ui::success(&format!("Uninstalled {name}"));
    }
    Ok(())
}
