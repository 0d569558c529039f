mod cli;
mod commands;
mod paths;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub credentials: Option<String>,
    pub section: Option<String>,
}

fn main() -> Result<()> {
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
        credentials: cli.credentials,
        section: cli.section,
    };

    match cli.command {
        Commands::Zone(args) => commands::zone::run(&ctx, args),
        Commands::Property(args) => commands::property::run(&ctx, args),
        Commands::AccessKey(args) => commands::access_key::run(&ctx, args),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tfport", &mut io::stdout());
            Ok(())
        }
    }
}
