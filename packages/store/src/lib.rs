//! # Pagetree Store
//!
//! Client-side node-state store for the content tree editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ intents: UI handlers, drag & drop, sync     │
//! └─────────────────────────────────────────────┘
//!                     ↓ Operation
//! ┌─────────────────────────────────────────────┐
//! │ store: single writer                        │
//! │  - Apply operation to a cloned snapshot     │
//! │  - Rebuild child index when structure moves │
//! │  - Commit, record history, notify           │
//! └─────────────────────────────────────────────┘
//!                     ↓ Arc<TreeState>
//! ┌─────────────────────────────────────────────┐
//! │ selectors: pure read-side queries           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Children are derived**: `Node::children` is always recomputed from
//!    parent links, never edited by hand
//! 2. **Operations never fail**: stale or missing keys turn an operation into
//!    a no-op
//! 3. **Snapshots are immutable**: the node map is a persistent map, so every
//!    committed snapshot stays valid for comparison and undo
//! 4. **No cascading delete**: removing a node orphans its descendants
//!
//! ## Usage
//!
//! ```rust
//! use pagetree_store::{MovePosition, NodeBatch, Operation, Store};
//! use serde_json::json;
//!
//! let mut store = Store::new();
//! store.dispatch(Operation::Init {
//!     nodes: NodeBatch::from_value(json!({
//!         "site": { "nodeType": "Site", "index": 0 },
//!         "a": { "nodeType": "Page", "parentContextPath": "site", "index": 1 },
//!         "b": { "nodeType": "Page", "parentContextPath": "site", "index": 2 },
//!     })),
//!     site_node: Some("site".to_string()),
//!     document_node: None,
//!     focused: None,
//! });
//!
//! let state = store.dispatch(Operation::Move {
//!     node_to_be_moved: "a".to_string(),
//!     target_node: "b".to_string(),
//!     position: MovePosition::After,
//! });
//!
//! let order: Vec<_> = state.by_context_path.get("site").unwrap()
//!     .children.iter().map(|c| c.context_path.as_str()).collect();
//! assert_eq!(order, ["b", "a"]);
//! ```

mod child_index;
mod config;
mod errors;
mod history;
mod node;
mod node_map;
mod operations;
pub mod selectors;
mod state;
mod store;

#[cfg(feature = "queue")]
mod queue;

pub use child_index::populate_children;
pub use config::StoreConfig;
pub use errors::StoreError;
pub use history::SnapshotHistory;
pub use node::{ChildRef, Node, NodeBatch, NodeProperties, MAX_SAFE_INDEX};
pub use node_map::NodeMap;
pub use operations::{parse_operations, MovePosition, Operation};
pub use state::{ClipboardMode, Focus, TreeState};
pub use store::{Commit, Store, Subscriber};

#[cfg(feature = "queue")]
pub use queue::{spawn_store, StoreHandle};
