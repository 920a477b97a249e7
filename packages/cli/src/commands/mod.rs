pub mod replay;
pub mod show;

pub use replay::{replay, ReplayArgs};
pub use show::{show, ShowArgs};

use anyhow::{Context, Result};
use pagetree_store::{NodeBatch, Operation};
use std::path::Path;

/// Read a node map file into an INIT operation
pub(crate) fn init_from_file(path: &Path, site: Option<String>) -> Result<Operation> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read node map {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Node map {} is not valid JSON", path.display()))?;

    Ok(Operation::Init {
        nodes: NodeBatch::from_value(value),
        site_node: site,
        document_node: None,
        focused: None,
    })
}
