//! # Operations
//!
//! Named intents applied to a tree snapshot.
//!
//! ## Operation Semantics
//!
//! ### Never fail
//! - A missing node, target or parent turns the operation into a no-op
//! - References left dangling by REMOVE are tolerated, not repaired
//!
//! ### Structure
//! - ADD, MOVE, SWITCH_DIMENSION and NORMALIZE_INDICES rebuild the whole
//!   child index after touching the node map
//! - REMOVE deletes one key and nothing else: descendants become orphaned
//!   fragments and the parent's child list is refreshed on the next rebuild
//!
//! ### Move
//! - `into` re-parents under the target with [`MAX_SAFE_INDEX`]
//! - `before`/`after` adopt the target's parent with the target's index ∓ 1
//! - Indices are never renormalized implicitly, so repeated moves can
//!   collide; NORMALIZE_INDICES re-spaces one sibling list on request

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::child_index::populate_children;
use crate::errors::StoreError;
use crate::node::{json_kind, NodeBatch, MAX_SAFE_INDEX};
use crate::node_map::NodeMap;
use crate::state::{ClipboardMode, Focus, TreeState};

/// Where a moved node lands relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovePosition {
    Into,
    Before,
    After,
}

/// Intents accepted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// Replace the whole store with a server-provided node map
    #[serde(rename_all = "camelCase")]
    Init {
        #[serde(default)]
        nodes: NodeBatch,
        site_node: Option<String>,
        document_node: Option<String>,
        focused: Option<Focus>,
    },

    /// Insert or fully replace node records
    Add { nodes: NodeBatch },

    #[serde(rename_all = "camelCase")]
    Move {
        node_to_be_moved: String,
        target_node: String,
        position: MovePosition,
    },

    #[serde(rename_all = "camelCase")]
    Focus {
        context_path: String,
        #[serde(default)]
        fusion_path: String,
    },

    Unfocus,

    #[serde(rename_all = "camelCase")]
    CommenceRemoval { context_path: String },

    RemovalAborted,

    /// Clears the pending removal; the node itself goes with a later REMOVE
    RemovalConfirmed,

    #[serde(rename_all = "camelCase")]
    Remove { context_path: String },

    #[serde(rename_all = "camelCase")]
    SwitchDimension {
        site_node_context_path: String,
        document_node_context_path: String,
        #[serde(default)]
        nodes: NodeBatch,
    },

    #[serde(rename_all = "camelCase")]
    Copy { context_path: String },

    #[serde(rename_all = "camelCase")]
    Cut { context_path: String },

    /// Clears the clipboard. The target is consumed by whoever performs the
    /// actual copy or move before dispatching this.
    #[serde(rename_all = "camelCase")]
    Paste { context_path: String },

    #[serde(rename_all = "camelCase")]
    Hide { context_path: String },

    #[serde(rename_all = "camelCase")]
    Show { context_path: String },

    #[serde(rename_all = "camelCase")]
    UpdateUri {
        old_uri_fragment: String,
        new_uri_fragment: String,
    },

    #[serde(rename_all = "camelCase")]
    SetDocumentNode { context_path: String },

    /// Re-space the children of one parent as `0, step, 2 * step, ...`
    #[serde(rename_all = "camelCase")]
    NormalizeIndices {
        parent_context_path: String,
        #[serde(default = "default_step")]
        step: i64,
    },
}

fn default_step() -> i64 {
    1
}

impl Operation {
    /// Debug name, as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Init { .. } => "INIT",
            Operation::Add { .. } => "ADD",
            Operation::Move { .. } => "MOVE",
            Operation::Focus { .. } => "FOCUS",
            Operation::Unfocus => "UNFOCUS",
            Operation::CommenceRemoval { .. } => "COMMENCE_REMOVAL",
            Operation::RemovalAborted => "REMOVAL_ABORTED",
            Operation::RemovalConfirmed => "REMOVAL_CONFIRMED",
            Operation::Remove { .. } => "REMOVE",
            Operation::SwitchDimension { .. } => "SWITCH_DIMENSION",
            Operation::Copy { .. } => "COPY",
            Operation::Cut { .. } => "CUT",
            Operation::Paste { .. } => "PASTE",
            Operation::Hide { .. } => "HIDE",
            Operation::Show { .. } => "SHOW",
            Operation::UpdateUri { .. } => "UPDATE_URI",
            Operation::SetDocumentNode { .. } => "SET_DOCUMENT_NODE",
            Operation::NormalizeIndices { .. } => "NORMALIZE_INDICES",
        }
    }

    /// Whether this operation can change the node map (and so is undoable)
    pub fn changes_nodes(&self) -> bool {
        matches!(
            self,
            Operation::Add { .. }
                | Operation::Move { .. }
                | Operation::Remove { .. }
                | Operation::SwitchDimension { .. }
                | Operation::Hide { .. }
                | Operation::Show { .. }
                | Operation::UpdateUri { .. }
                | Operation::NormalizeIndices { .. }
        )
    }

    /// Apply to a snapshot in place
    pub fn apply(&self, state: &mut TreeState) {
        match self {
            Operation::Init {
                nodes,
                site_node,
                document_node,
                focused,
            } => Self::apply_init(state, nodes, site_node, document_node, focused),

            Operation::Add { nodes } => Self::merge_nodes(state, nodes),

            Operation::Move {
                node_to_be_moved,
                target_node,
                position,
            } => Self::apply_move(state, node_to_be_moved, target_node, *position),

            Operation::Focus {
                context_path,
                fusion_path,
            } => {
                state.focused = Focus::new(context_path.as_str(), fusion_path.as_str());
            }

            Operation::Unfocus => state.focused = Focus::default(),

            Operation::CommenceRemoval { context_path } => {
                state.to_be_removed = Some(context_path.clone());
            }

            Operation::RemovalAborted | Operation::RemovalConfirmed => state.to_be_removed = None,

            Operation::Remove { context_path } => {
                if state.by_context_path.remove(context_path).is_none() {
                    debug!(context_path = %context_path, "REMOVE of unknown node - no-op");
                }
            }

            Operation::SwitchDimension {
                site_node_context_path,
                document_node_context_path,
                nodes,
            } => {
                state.site_node = Some(site_node_context_path.clone());
                state.document_node = Some(document_node_context_path.clone());
                state.focused = Focus::default();
                Self::merge_nodes(state, nodes);
            }

            Operation::Copy { context_path } => {
                state.clipboard = Some(context_path.clone());
                state.clipboard_mode = Some(ClipboardMode::Copy);
            }

            Operation::Cut { context_path } => {
                state.clipboard = Some(context_path.clone());
                state.clipboard_mode = Some(ClipboardMode::Move);
            }

            Operation::Paste { .. } => state.clipboard = None,

            Operation::Hide { context_path } => Self::set_hidden(state, context_path, true),

            Operation::Show { context_path } => Self::set_hidden(state, context_path, false),

            Operation::UpdateUri {
                old_uri_fragment,
                new_uri_fragment,
            } => Self::apply_update_uri(state, old_uri_fragment, new_uri_fragment),

            Operation::SetDocumentNode { context_path } => {
                state.document_node = Some(context_path.clone());
            }

            Operation::NormalizeIndices {
                parent_context_path,
                step,
            } => Self::apply_normalize(state, parent_context_path, *step),
        }
    }

    fn apply_init(
        state: &mut TreeState,
        nodes: &NodeBatch,
        site_node: &Option<String>,
        document_node: &Option<String>,
        focused: &Option<Focus>,
    ) {
        let prior = std::mem::take(state);
        let map: NodeMap = nodes.iter().cloned().collect();

        *state = TreeState {
            by_context_path: populate_children(&map),
            site_node: site_node.clone().or(prior.site_node),
            document_node: document_node.clone().or(prior.document_node),
            focused: focused.clone().unwrap_or(prior.focused),
            ..TreeState::default()
        };
    }

    fn merge_nodes(state: &mut TreeState, nodes: &NodeBatch) {
        for node in nodes.iter() {
            let mut node = node.clone();
            node.children.clear();
            state.by_context_path.insert(node);
        }
        state.by_context_path = populate_children(&state.by_context_path);
    }

    fn apply_move(state: &mut TreeState, node_id: &str, target_id: &str, position: MovePosition) {
        let Some(target) = state.by_context_path.get(target_id) else {
            debug!(target = %target_id, "MOVE to unknown target - no-op");
            return;
        };

        let (index, parent) = match position {
            MovePosition::Into => (MAX_SAFE_INDEX, Some(target.context_path.clone())),
            MovePosition::Before => (
                target.index.saturating_sub(1),
                target.parent_context_path.clone(),
            ),
            MovePosition::After => (
                target.index.saturating_add(1),
                target.parent_context_path.clone(),
            ),
        };

        let Some(node) = state.by_context_path.get_mut(node_id) else {
            debug!(node = %node_id, "MOVE of unknown node - no-op");
            return;
        };
        node.index = index;
        node.parent_context_path = parent;

        state.by_context_path = populate_children(&state.by_context_path);
    }

    fn set_hidden(state: &mut TreeState, context_path: &str, hidden: bool) {
        match state.by_context_path.get_mut(context_path) {
            Some(node) => node.properties.hidden = hidden,
            None => debug!(context_path = %context_path, hidden, "Visibility change for unknown node - no-op"),
        }
    }

    fn apply_update_uri(state: &mut TreeState, old_fragment: &str, new_fragment: &str) {
        if old_fragment.is_empty() {
            return;
        }

        // Collect first so untouched records keep sharing structure
        let rewrites: Vec<(String, String)> = state
            .by_context_path
            .nodes()
            .into_iter()
            .filter_map(|node| {
                let uri = node.uri.as_deref()?;
                let rewritten = rewrite_ancestor_fragment(uri, old_fragment, new_fragment)?;
                Some((node.context_path.clone(), rewritten))
            })
            .collect();

        for (context_path, rewritten) in &rewrites {
            if let Some(node) = state.by_context_path.get_mut(context_path) {
                node.uri = Some(rewritten.clone());
            }
        }

        debug!(old = %old_fragment, new = %new_fragment, rewritten = rewrites.len(), "Rewrote node URIs");
    }

    fn apply_normalize(state: &mut TreeState, parent_id: &str, step: i64) {
        let Some(parent) = state.by_context_path.get(parent_id) else {
            debug!(parent = %parent_id, "NORMALIZE_INDICES for unknown parent - no-op");
            return;
        };

        let step = step.max(1);
        let order: Vec<String> = parent
            .children
            .iter()
            .map(|child| child.context_path.clone())
            .collect();

        let mut next_index = 0i64;
        for context_path in &order {
            if let Some(child) = state.by_context_path.get_mut(context_path) {
                child.index = next_index;
                next_index = next_index.saturating_add(step);
            }
        }

        state.by_context_path = populate_children(&state.by_context_path);
    }
}

/// Replace the first occurrence of `old` that ends on a separator (`/` or
/// `@`). Later occurrences name other nodes further down the path.
fn rewrite_ancestor_fragment(uri: &str, old: &str, new: &str) -> Option<String> {
    let start = uri.char_indices().map(|(start, _)| start).find(|&start| {
        uri[start..].starts_with(old)
            && matches!(uri.as_bytes().get(start + old.len()), Some(b'/' | b'@'))
    })?;

    let mut rewritten = String::with_capacity(uri.len() + new.len());
    rewritten.push_str(&uri[..start]);
    rewritten.push_str(new);
    rewritten.push_str(&uri[start + old.len()..]);
    Some(rewritten)
}

/// Parse an operation script: a JSON array of operations or a single one
pub fn parse_operations(input: &str) -> Result<Vec<Operation>, StoreError> {
    match serde_json::from_str::<Value>(input)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(StoreError::from))
            .collect(),
        item @ Value::Object(_) => Ok(vec![serde_json::from_value(item)?]),
        other => Err(StoreError::UnexpectedShape {
            expected: "an operation or an array of operations",
            found: json_kind(&other),
        }),
    }
}
