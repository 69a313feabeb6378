//! Datei CLI - browse, read, and watch the local filesystem through the
//! `datei` provider.
//!
//! The binary plays the host's role: it activates the provider in a
//! registry and routes every target through it, so what it prints is
//! exactly what a host application would see.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "datei")]
#[command(version = datei::VERSION)]
#[command(
    about = "Browse, read, and watch local files through the datei provider",
    long_about = None
)]
struct Cli {
    /// Use this configuration file instead of ~/.datei/config.ini
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show kind, size, and modification time of a resource
    Stat {
        /// Resource identifier (datei:/path) or filesystem path
        target: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a directory
    Ls {
        /// Resource identifier (datei:/path) or filesystem path
        target: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a file's contents to stdout
    Cat {
        /// Resource identifier (datei:/path) or filesystem path
        target: String,
    },

    /// Print change events under a directory until Ctrl-C
    Watch {
        /// Resource identifier (datei:/path) or filesystem path
        target: String,

        /// Watch only the directory itself, not its subtree
        #[arg(long)]
        no_recursive: bool,

        /// Glob pattern to ignore (repeatable)
        #[arg(long = "exclude", value_name = "GLOB")]
        excludes: Vec<String>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    let verbose = cli.verbose;
    let runner = || CliRunner::new(config_path, verbose);

    match cli.command {
        Commands::Stat { target, json } => {
            commands::stat::run(commands::stat::StatArgs { target, json }, &runner()?)
        }
        Commands::Ls { target, json } => {
            commands::ls::run(commands::ls::LsArgs { target, json }, &runner()?)
        }
        Commands::Cat { target } => commands::cat::run(&target, &runner()?),
        Commands::Watch {
            target,
            no_recursive,
            excludes,
        } => commands::watch::run(
            commands::watch::WatchArgs {
                target,
                no_recursive,
                excludes,
            },
            &runner()?,
        ),
        // Config management doesn't need the runtime or the provider.
        Commands::Config { command } => commands::config::run(command, config_path),
    }
}
