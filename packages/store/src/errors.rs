//! Error types for the store
//!
//! Operations themselves never fail; these cover the edges where external
//! data enters (JSON decoding) and the dispatch queue.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[cfg(feature = "queue")]
    #[error("Store queue is closed")]
    QueueClosed,
}
