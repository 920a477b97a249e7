//! Tree store snapshot

use serde::{Deserialize, Serialize, Serializer};

use crate::node_map::NodeMap;

/// One committed state of the node store.
///
/// `focused`, `to_be_removed` and `clipboard` may point at context paths that
/// no longer exist; readers check before dereferencing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeState {
    pub by_context_path: NodeMap,

    #[serde(serialize_with = "empty_if_none")]
    pub site_node: Option<String>,

    #[serde(serialize_with = "empty_if_none")]
    pub document_node: Option<String>,

    pub focused: Focus,

    #[serde(serialize_with = "empty_if_none")]
    pub to_be_removed: Option<String>,

    #[serde(serialize_with = "empty_if_none")]
    pub clipboard: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard_mode: Option<ClipboardMode>,
}

/// Focused node and its on-screen locator; both empty when nothing is focused
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    pub context_path: String,
    #[serde(default)]
    pub fusion_path: String,
}

impl Focus {
    pub fn new(context_path: impl Into<String>, fusion_path: impl Into<String>) -> Self {
        Self {
            context_path: context_path.into(),
            fusion_path: fusion_path.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.context_path.is_empty()
    }
}

/// What a paste does with the clipboard node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardMode {
    Copy,
    Move,
}

fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
