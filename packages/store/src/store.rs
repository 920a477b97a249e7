//! # Store
//!
//! Single-writer state container. [`Store::dispatch`] is the only way to
//! produce a new snapshot; everything else reads the latest committed
//! `Arc<TreeState>`.
//!
//! ## Lifecycle
//!
//! ```text
//! dispatch(op)
//!   clone snapshot (O(1)) → apply op → record history → commit → notify
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::StoreConfig;
use crate::history::SnapshotHistory;
use crate::node_map::NodeMap;
use crate::operations::Operation;
use crate::state::TreeState;

/// What produced a commit
#[derive(Debug, Clone, Copy)]
pub enum Commit<'a> {
    Operation(&'a Operation),
    Undo,
    Redo,
}

/// Read-only observer of committed snapshots
pub trait Subscriber: Send {
    fn on_commit(&mut self, commit: Commit<'_>, state: &TreeState);
}

impl<F> Subscriber for F
where
    F: FnMut(Commit<'_>, &TreeState) + Send,
{
    fn on_commit(&mut self, commit: Commit<'_>, state: &TreeState) {
        self(commit, state)
    }
}

pub struct Store {
    current: Arc<TreeState>,

    /// Increments on every commit
    version: u64,

    /// Previous node maps for undoable operations
    history: SnapshotHistory<NodeMap>,

    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            current: Arc::new(TreeState::default()),
            version: 0,
            history: SnapshotHistory::new(config.history_depth),
            subscribers: Vec::new(),
        }
    }

    /// Latest committed snapshot
    pub fn state(&self) -> Arc<TreeState> {
        Arc::clone(&self.current)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply an operation and commit the resulting snapshot
    pub fn dispatch(&mut self, operation: Operation) -> Arc<TreeState> {
        let mut next = TreeState::clone(&self.current);
        operation.apply(&mut next);

        match &operation {
            Operation::Init { .. } => self.history.clear(),
            op if op.changes_nodes() => self.history.record(self.current.by_context_path.clone()),
            _ => {}
        }

        debug!(
            operation = operation.name(),
            version = self.version + 1,
            nodes = next.by_context_path.len(),
            "Dispatched operation"
        );

        self.commit(next, Commit::Operation(&operation))
    }

    /// Restore the node map from before the last undoable operation.
    ///
    /// Focus, clipboard and pending removal stay as they are.
    pub fn undo(&mut self) -> bool {
        let current = self.current.by_context_path.clone();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };

        let mut next = TreeState::clone(&self.current);
        next.by_context_path = previous;
        self.commit(next, Commit::Undo);
        true
    }

    /// Reapply the node map undone last
    pub fn redo(&mut self) -> bool {
        let current = self.current.by_context_path.clone();
        let Some(restored) = self.history.redo(current) else {
            return false;
        };

        let mut next = TreeState::clone(&self.current);
        next.by_context_path = restored;
        self.commit(next, Commit::Redo);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn commit(&mut self, next: TreeState, commit: Commit<'_>) -> Arc<TreeState> {
        self.current = Arc::new(next);
        self.version += 1;

        for subscriber in &mut self.subscribers {
            subscriber.on_commit(commit, &self.current);
        }

        Arc::clone(&self.current)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.version)
            .field("nodes", &self.current.by_context_path.len())
            .field("undo_levels", &self.history.undo_levels())
            .field("redo_levels", &self.history.redo_levels())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
