use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brewcask")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative Homebrew cask management for macOS", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the installed version of a cask
    Query {
        /// Cask token (e.g. firefox)
        name: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install a cask
    Install {
        /// Cask token (e.g. firefox)
        name: String,

        /// Extra options passed to `brew install` (after `--`)
        #[arg(last = true)]
        options: Vec<String>,
    },

    /// Uninstall a cask (always forced)
    Uninstall {
        /// Cask token (e.g. firefox)
        name: String,
    },

    /// Show what `apply` would change
    Status(ManifestArgs),

    /// Converge installed casks to the manifest
    Apply(ApplyArgs),

    /// Show resolved settings and the environment passed to brew
    Env,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct ManifestArgs {
    /// Cask manifest (default: <config dir>/casks.toml)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Show what would change without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}
