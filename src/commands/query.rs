//! `brewcask query` - report the installed version of a cask

use anyhow::Result;
use declarative::PackageStatus;

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, name: &str, json: bool) -> Result<()> {
    let status = super::provider()?.query(name)?;

    if json {
        println!("{}", render_json(status.as_ref())?);
        return Ok(());
    }

    match status {
        Some(status) => println!("{}", render_plain(&status)),
        None if !ctx.quiet => ui::info(&format!("{name} is not installed")),
        None => {}
    }
    Ok(())
}

fn render_plain(status: &PackageStatus) -> String {
    format!("{} {}", status.name, status.version)
}

/// `{"name": ..., "version": ...}` when installed, `null` otherwise
fn render_json(status: Option<&PackageStatus>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&status)?)
}
