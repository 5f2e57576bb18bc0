use std::io::Write;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use tim_cli::commands::{event, log, project};
use tim_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; warnings such as skipped
    // log files are shown unless RUST_LOG says otherwise.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Project(action) => project::run(&mut out, &config, action)?,
        Commands::Event(action) => event::run(&mut out, &config, action)?,
        Commands::Log(action) => log::run(&mut out, &config, action)?,
    }
    out.flush()?;

    Ok(())
}
