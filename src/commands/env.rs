//! `brewcask env` - show resolved settings

use anyhow::Result;
use caskkit::{ProviderSettings, user};

use crate::Context;
use crate::paths;
use crate::ui;

pub fn run(_ctx: &Context) -> Result<()> {
    let casks = super::provider()?;
    let settings = casks.settings();

    ui::header("brewcask environment");

    ui::section("Paths");
    ui::kv("Config dir", &paths::config_dir()?.display().to_string());
    ui::kv("Homebrew root", &settings.homebrew_root.display().to_string());
    ui::kv("Legacy caskroom", &settings.legacy_caskroom.display().to_string());
    ui::kv("Caskroom in use", &casks.caskroom().display().to_string());
    ui::kv("Ask-pass dir", &settings.askpass_dir.display().to_string());

    ui::section("Commands");
    ui::kv("brew", &settings.brew_command);
    ui::kv("Tap", &settings.tap);
    ui::kv("User", &settings.user);
    ui::kv("Run as", &run_as_label(settings));

    ui::section("Command environment");
    for (key, value) in settings.command_environment() {
        ui::kv(&key, &value);
    }
    Ok(())
}

fn run_as_label(settings: &ProviderSettings) -> String {
    match user::run_as(&settings.user) {
        Ok(Some(identity)) => format!("{} (uid {})", identity.name, identity.uid),
        Ok(None) => "current user".to_string(),
        Err(e) => format!("unresolved ({e})"),
    }
}
