//! assetkit - content-addressed static asset server.

mod cli;

use anyhow::{Context, Result};
use assetkit::config::AssetkitConfig;
use assetkit::logger;
use clap::{ColorChoice, Parser};
use cli::serve::ServeOptions;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    cli::shutdown::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AssetkitConfig::discover(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config.validate()?;

    let mode = cli.mode();
    match &cli.command {
        Commands::Serve {
            interface,
            port,
            watch,
        } => cli::serve::serve(
            &config,
            mode,
            ServeOptions {
                interface: *interface,
                port: *port,
                watch: *watch,
            },
        ),
        Commands::Sync { watch, strategy } => cli::sync::run_sync(&config, *watch, *strategy),
        Commands::Path { paths } => cli::path::print_paths(&config, mode, paths),
    }
}
