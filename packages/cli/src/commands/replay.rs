use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagetree_store::{parse_operations, Store};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::output::{print_summary, print_tree};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON node map keyed by context path
    pub nodes: PathBuf,

    /// JSON operation script (one operation or an array)
    pub operations: PathBuf,

    /// Context path of the site root
    #[arg(short, long)]
    pub site: Option<String>,

    /// Undo this many node map changes after the script ran
    #[arg(long, default_value = "0")]
    pub undo: usize,

    /// Print the final snapshot as JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

pub fn replay(args: ReplayArgs, config: &Config) -> Result<()> {
    let script = std::fs::read_to_string(&args.operations)
        .with_context(|| format!("Cannot read operations {}", args.operations.display()))?;
    let operations = parse_operations(&script)
        .with_context(|| format!("Invalid operation script {}", args.operations.display()))?;

    let mut store = Store::with_config(config.store.clone());
    store.dispatch(super::init_from_file(&args.nodes, args.site)?);

    let total = operations.len();
    for operation in operations {
        store.dispatch(operation);
    }

    let mut undone = 0;
    while undone < args.undo && store.undo() {
        undone += 1;
    }

    info!(operations = total, undone, version = store.version(), "Replay complete");

    let state = store.state();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&*state)?);
        return Ok(());
    }

    println!("🔁 {} {}", "Replayed".green().bold(), args.operations.display());
    println!("   Operations: {}", total);
    if undone > 0 {
        println!("   Undone: {}", undone);
    }
    println!();
    print_tree(&state);
    println!();
    print_summary(&state);

    Ok(())
}
