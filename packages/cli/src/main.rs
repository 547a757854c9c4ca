mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{export, prepare, ExportArgs, PrepareArgs};
use tracing_subscriber::EnvFilter;

/// ManimDSL CLI - drive the online editor's workflow from a terminal
#[derive(Parser, Debug)]
#[command(name = "manimdsl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the compile request for a program and style configuration
    Prepare(PrepareArgs),

    /// Write the program and style configuration under their tracked names
    Export(ExportArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Prepare(args) => prepare(args, &cwd),
            Command::Export(args) => export(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
