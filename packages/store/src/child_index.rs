//! # Child Index Builder
//!
//! Derives every node's ordered `children` list from the parent links in a
//! node map. Always a full rebuild: a single parent or index change can
//! reorder several sibling lists at once.
//!
//! Ordering is ascending by `index` with a stable sort over encounter order,
//! so siblings sharing an index keep the order in which their keys entered
//! the map. A node whose parent is not in the map is a root fragment and
//! lands in no list.

use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::node::ChildRef;
use crate::node_map::NodeMap;

/// Return a copy of `nodes` with every `children` list recomputed
#[instrument(level = "trace", skip_all, fields(nodes = nodes.len()))]
pub fn populate_children(nodes: &NodeMap) -> NodeMap {
    let mut lists: HashMap<&str, Vec<ChildRef>> = HashMap::new();

    for node in nodes.nodes() {
        let Some(parent) = node.parent_context_path.as_deref() else {
            continue;
        };
        if nodes.contains_key(parent) {
            lists.entry(parent).or_default().push(ChildRef::from(node));
        }
    }

    for children in lists.values_mut() {
        children.sort_by(|a, b| a.index.cmp(&b.index));
    }

    trace!(parents = lists.len(), "Rebuilt child index");

    let mut next = nodes.clone();
    for node in next.nodes_mut() {
        node.children = lists.remove(node.context_path.as_str()).unwrap_or_default();
    }
    next
}
