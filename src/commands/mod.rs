pub mod apply;
pub mod env;
pub mod install;
pub mod query;
pub mod uninstall;

use anyhow::Result;
use caskkit::BrewCask;

use crate::config;

/// Provider configured from the environment and `config.toml`
pub fn provider() -> Result<BrewCask> {
    Ok(BrewCask::new(config::provider_settings()?))
}
