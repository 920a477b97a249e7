//! # Node Records
//!
//! A node is identified by its context path, which encodes both the node
//! identity and the dimension it lives in. Records arrive from the server as
//! a JSON object keyed by context path; [`NodeBatch`] decodes such an object
//! entry by entry, so one malformed record never takes the rest down with it.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Index given to a node moved `into` another one: the largest integer a
/// JSON number can hold exactly, so it sorts after every regular sibling.
pub const MAX_SAFE_INDEX: i64 = 9_007_199_254_740_991;

/// A single node record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Identity of the node (always equal to its key in the node map)
    #[serde(default)]
    pub context_path: String,

    /// Parent node, `None` for roots
    #[serde(default, deserialize_with = "non_empty_string")]
    pub parent_context_path: Option<String>,

    pub node_type: String,

    /// Ordering key among siblings (neither dense nor unique)
    #[serde(default, deserialize_with = "lenient_index")]
    pub index: i64,

    #[serde(default)]
    pub properties: NodeProperties,

    /// Full URI, only set for document nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Derived by the child index builder; incoming values are discarded
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

impl Node {
    pub fn new(context_path: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            context_path: context_path.into(),
            parent_context_path: None,
            node_type: node_type.into(),
            index: 0,
            properties: NodeProperties::default(),
            uri: None,
            children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_context_path: impl Into<String>) -> Self {
        self.parent_context_path = Some(parent_context_path.into());
        self
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = index;
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.properties.hidden
    }
}

/// Open property bag with `_hidden` lifted into a typed field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    #[serde(rename = "_hidden", default, deserialize_with = "bool_or_null")]
    pub hidden: bool,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Lightweight child entry kept in a parent's `children` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRef {
    pub context_path: String,
    pub node_type: String,
    #[serde(default, deserialize_with = "lenient_index")]
    pub index: i64,
}

impl From<&Node> for ChildRef {
    fn from(node: &Node) -> Self {
        Self {
            context_path: node.context_path.clone(),
            node_type: node.node_type.clone(),
            index: node.index,
        }
    }
}

/// Ordered batch of node records, as carried by INIT, ADD and
/// SWITCH_DIMENSION
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeBatch {
    nodes: Vec<Node>,
}

impl NodeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw `{ contextPath: record }` object.
    ///
    /// Entries that fail to decode are dropped with a warning. Anything other
    /// than an object yields an empty batch.
    pub fn from_value(value: Value) -> Self {
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                warn!(found = json_kind(&other), "Node map is not an object - ignoring it");
                return Self::default();
            }
        };

        let mut nodes = Vec::with_capacity(entries.len());
        for (context_path, raw) in entries {
            match serde_json::from_value::<Node>(raw) {
                Ok(mut node) => {
                    node.context_path = context_path;
                    node.children.clear();
                    nodes.push(node);
                }
                Err(e) => {
                    warn!(context_path = %context_path, error = %e, "Skipping malformed node record");
                }
            }
        }

        Self { nodes }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

impl FromIterator<Node> for NodeBatch {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for NodeBatch {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl Serialize for NodeBatch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.context_path, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NodeBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_empty_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Any JSON number (or null) is a usable index. Fractions are rounded to the
/// nearest integer and out-of-range values saturate.
fn lenient_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if let Some(index) = number.as_i64() {
        return Ok(index);
    }

    let raw = number
        .as_f64()
        .ok_or_else(|| D::Error::custom(format!("index {number} is not representable")))?;
    let index = raw.round() as i64;
    warn!(raw, index, "Node index is not an integer - rounding");
    Ok(index)
}

fn bool_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
