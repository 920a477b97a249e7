use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Undo levels kept for node map changes (0 disables history)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

fn default_history_depth() -> usize {
    100
}

impl StoreConfig {
    pub fn from_json_str(input: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(input)?)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
        }
    }
}
