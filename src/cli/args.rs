//! Command-line interface definitions.

use assetkit::fs::Mode;
use assetkit::sync::SyncStrategy;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content-addressed asset server and tree synchronizer
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file name, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = assetkit::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Filesystem mode (default: from ASSETKIT_ENV, else production)
    #[arg(short, long, global = true, value_enum)]
    pub mode: Option<Mode>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Mode from `--mode`, falling back to the environment.
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or_else(Mode::from_env)
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve assets under the configured prefix
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Mirror the sync input while serving (development mode only)
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Copy the sync input tree into the output tree
    Sync {
        /// Keep watching the input tree after the initial copy
        #[arg(short, long)]
        watch: bool,

        /// How changes are applied while watching
        #[arg(long, value_enum)]
        strategy: Option<SyncStrategy>,
    },

    /// Print the fingerprinted serving path of logical assets
    #[command(visible_alias = "p")]
    Path {
        /// Logical asset paths (e.g. js/main.js)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}
