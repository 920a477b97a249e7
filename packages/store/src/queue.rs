//! Single-writer dispatch queue for multi-threaded hosts.
//!
//! [`spawn_store`] moves a [`Store`] onto a tokio task. Any number of
//! [`StoreHandle`]s push commands onto one channel; the task applies them
//! strictly in arrival order and publishes each committed snapshot on a
//! `watch` channel. The task ends, handing the store back, once every handle
//! is dropped.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::errors::StoreError;
use crate::operations::Operation;
use crate::state::TreeState;
use crate::store::Store;

#[derive(Debug)]
enum Command {
    Dispatch(Operation),
    Undo,
    Redo,
}

#[derive(Debug, Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Arc<TreeState>>,
}

impl StoreHandle {
    pub fn dispatch(&self, operation: Operation) -> Result<(), StoreError> {
        self.send(Command::Dispatch(operation))
    }

    pub fn undo(&self) -> Result<(), StoreError> {
        self.send(Command::Undo)
    }

    pub fn redo(&self) -> Result<(), StoreError> {
        self.send(Command::Redo)
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> Arc<TreeState> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Receiver that wakes on every commit
    pub fn subscribe(&self) -> watch::Receiver<Arc<TreeState>> {
        self.snapshots.clone()
    }

    fn send(&self, command: Command) -> Result<(), StoreError> {
        self.commands
            .send(command)
            .map_err(|_| StoreError::QueueClosed)
    }
}

/// Run `store` as the single writer on a tokio task
pub fn spawn_store(mut store: Store) -> (StoreHandle, JoinHandle<Store>) {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(store.state());

    let task = tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            let changed = match command {
                Command::Dispatch(operation) => {
                    store.dispatch(operation);
                    true
                }
                Command::Undo => store.undo(),
                Command::Redo => store.redo(),
            };

            if changed {
                snapshot_tx.send_replace(store.state());
            }
        }

        debug!(version = store.version(), "Store queue drained");
        store
    });

    let handle = StoreHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
    };

    (handle, task)
}
