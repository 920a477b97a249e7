mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{replay, show, ReplayArgs, ShowArgs};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Pagetree CLI - inspect and replay content tree state
#[derive(Parser, Debug)]
#[command(name = "pagetree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tracing filter (overrides the config file; RUST_LOG wins over both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap a store from a node map and print the tree
    Show(ShowArgs),

    /// Bootstrap a store, apply an operation script and print the result
    Replay(ReplayArgs),
}

fn main() {
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => exit_with(err.into()),
    };

    let config = match Config::load(&cwd) {
        Ok(config) => config,
        Err(err) => exit_with(err),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Show(args) => show(args, &config),
        Command::Replay(args) => replay(args, &config),
    };

    if let Err(err) = result {
        exit_with(err);
    }
}

fn exit_with(err: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("{} {:#}", "Error:".red().bold(), err);
    eprintln!();
    std::process::exit(1);
}
