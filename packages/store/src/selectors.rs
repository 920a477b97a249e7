//! # Selectors
//!
//! Pure read-side queries over a [`TreeState`] snapshot. None of them mutate,
//! and all of them answer `None` or an empty list for context paths that are
//! not (or no longer) in the map. Walks guard against parent cycles, which
//! the engine does not prevent.

use std::collections::HashSet;

use crate::node::Node;
use crate::operations::MovePosition;
use crate::state::TreeState;

pub fn node<'a>(state: &'a TreeState, context_path: &str) -> Option<&'a Node> {
    state.by_context_path.get(context_path)
}

pub fn site_node(state: &TreeState) -> Option<&Node> {
    state.site_node.as_deref().and_then(|cp| node(state, cp))
}

pub fn document_node(state: &TreeState) -> Option<&Node> {
    state.document_node.as_deref().and_then(|cp| node(state, cp))
}

pub fn focused_node(state: &TreeState) -> Option<&Node> {
    if state.focused.is_empty() {
        return None;
    }
    node(state, &state.focused.context_path)
}

/// Context paths currently focused (zero or one entry)
pub fn focused_context_paths(state: &TreeState) -> Vec<&str> {
    if state.focused.is_empty() {
        Vec::new()
    } else {
        vec![state.focused.context_path.as_str()]
    }
}

pub fn clipboard_node(state: &TreeState) -> Option<&Node> {
    state.clipboard.as_deref().and_then(|cp| node(state, cp))
}

pub fn node_to_be_removed(state: &TreeState) -> Option<&Node> {
    state.to_be_removed.as_deref().and_then(|cp| node(state, cp))
}

pub fn is_hidden(state: &TreeState, context_path: &str) -> Option<bool> {
    node(state, context_path).map(Node::is_hidden)
}

pub fn parent_of<'a>(state: &'a TreeState, context_path: &str) -> Option<&'a Node> {
    node(state, context_path)?
        .parent_context_path
        .as_deref()
        .and_then(|parent| node(state, parent))
}

/// Resolved child records in sibling order; stale entries are skipped
pub fn children_of<'a>(state: &'a TreeState, context_path: &str) -> Vec<&'a Node> {
    node(state, context_path)
        .map(|parent| {
            parent
                .children
                .iter()
                .filter_map(|child| node(state, &child.context_path))
                .collect()
        })
        .unwrap_or_default()
}

/// Resolvable ancestors, nearest first
pub fn ancestors_of<'a>(state: &'a TreeState, context_path: &str) -> Vec<&'a Node> {
    let mut ancestors = Vec::new();
    let mut seen = HashSet::from([context_path]);
    let mut current = parent_of(state, context_path);

    while let Some(ancestor) = current {
        if !seen.insert(ancestor.context_path.as_str()) {
            break;
        }
        ancestors.push(ancestor);
        current = parent_of(state, &ancestor.context_path);
    }

    ancestors
}

/// All descendants, depth-first pre-order
pub fn descendants_of<'a>(state: &'a TreeState, context_path: &str) -> Vec<&'a Node> {
    outline(state, context_path)
        .into_iter()
        .skip(1)
        .map(|(_, node)| node)
        .collect()
}

/// `true` when `candidate` sits somewhere below `ancestor`
pub fn is_descendant(state: &TreeState, candidate: &str, ancestor: &str) -> bool {
    ancestors_of(state, candidate)
        .iter()
        .any(|node| node.context_path == ancestor)
}

/// Whether a MOVE of `node_to_be_moved` relative to `target` would keep the
/// tree well formed: both exist, the target is neither the node nor one of
/// its descendants, and `before`/`after` targets have a parent to join.
pub fn can_move(
    state: &TreeState,
    node_to_be_moved: &str,
    target: &str,
    position: MovePosition,
) -> bool {
    let Some(target_node) = node(state, target) else {
        return false;
    };
    if node(state, node_to_be_moved).is_none() || node_to_be_moved == target {
        return false;
    }
    if is_descendant(state, target, node_to_be_moved) {
        return false;
    }

    match position {
        MovePosition::Into => true,
        MovePosition::Before | MovePosition::After => target_node.parent_context_path.is_some(),
    }
}

/// Depth-annotated pre-order walk starting at `root` (depth 0)
pub fn outline<'a>(state: &'a TreeState, root: &str) -> Vec<(usize, &'a Node)> {
    let Some(root) = node(state, root) else {
        return Vec::new();
    };

    let mut walk = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![(0usize, root)];

    while let Some((depth, current)) = stack.pop() {
        if !seen.insert(current.context_path.as_str()) {
            continue;
        }
        walk.push((depth, current));

        for child in current.children.iter().rev() {
            if let Some(child) = node(state, &child.context_path) {
                stack.push((depth + 1, child));
            }
        }
    }

    walk
}
