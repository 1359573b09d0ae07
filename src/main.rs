mod cli;
mod commands;
mod config;
mod engine;
mod paths;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() {
    if let Err(e) = run() {
        ui::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Query { name, json } => commands::query::run(&ctx, &name, json),
        Command::Install { name, options } => commands::install::run(&ctx, &name, &options),
        Command::Uninstall { name } => commands::uninstall::run(&ctx, &name),
        Command::Status(args) => commands::apply::status(&ctx, args.file.as_deref()),
        Command::Apply(args) => commands::apply::apply(
            &ctx,
            args.manifest.file.as_deref(),
            args.dry_run,
            args.yes,
        ),
        Command::Env => commands::env::run(&ctx),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "brewcask", &mut io::stdout());
            Ok(())
        }
    }
}
