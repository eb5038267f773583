mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, init, place, reflow, CheckArgs, InitArgs, PlaceArgs, ReflowArgs};

/// Brickwork CLI - responsive brick page tools
#[derive(Parser, Debug)]
#[command(name = "brickwork")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and an example page
    Init(InitArgs),

    /// Audit page files for overlapping or out-of-bounds bricks
    Check(CheckArgs),

    /// Resolve a pixel drop into a grid placement
    Place(PlaceArgs),

    /// Re-derive the mobile layout from the desktop layout
    Reflow(ReflowArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Check(args) => check(args, &cwd),
            Command::Place(args) => place(args, &cwd),
            Command::Reflow(args) => reflow(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
