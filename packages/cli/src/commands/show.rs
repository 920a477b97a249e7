use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagetree_store::Store;
use std::path::PathBuf;

use crate::config::Config;
use crate::output::{print_summary, print_tree};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// JSON node map keyed by context path
    pub nodes: PathBuf,

    /// Context path of the site root
    #[arg(short, long)]
    pub site: Option<String>,

    /// Print the snapshot as JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, config: &Config) -> Result<()> {
    let mut store = Store::with_config(config.store.clone());
    let state = store.dispatch(super::init_from_file(&args.nodes, args.site)?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*state)?);
        return Ok(());
    }

    println!("🌳 {} {}", "Tree".green().bold(), args.nodes.display());
    println!();
    print_tree(&state);
    println!();
    print_summary(&state);

    Ok(())
}
