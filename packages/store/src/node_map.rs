//! Persistent node map keyed by context path.
//!
//! Backed by `im::HashMap`, so cloning a map is O(1) and every committed
//! snapshot keeps its own view. Each key also remembers when it was first
//! inserted; that encounter order breaks ties between siblings with equal
//! indices.

use crate::node::Node;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    seq: u64,
    node: Node,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMap {
    slots: im::HashMap<String, Slot>,
    next_seq: u64,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains_key(&self, context_path: &str) -> bool {
        self.slots.contains_key(context_path)
    }

    pub fn get(&self, context_path: &str) -> Option<&Node> {
        self.slots.get(context_path).map(|slot| &slot.node)
    }

    pub fn get_mut(&mut self, context_path: &str) -> Option<&mut Node> {
        self.slots.get_mut(context_path).map(|slot| &mut slot.node)
    }

    /// Insert or fully replace the record stored under `node.context_path`.
    ///
    /// A replaced record keeps its original encounter position.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        let key = node.context_path.clone();
        match self.slots.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(&mut slot.node, node)),
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.slots.insert(key, Slot { seq, node });
                None
            }
        }
    }

    pub fn remove(&mut self, context_path: &str) -> Option<Node> {
        self.slots.remove(context_path).map(|slot| slot.node)
    }

    /// Records in encounter order
    pub fn nodes(&self) -> Vec<&Node> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.node).collect()
    }

    /// Context paths in encounter order
    pub fn keys(&self) -> Vec<&str> {
        self.nodes()
            .into_iter()
            .map(|node| node.context_path.as_str())
            .collect()
    }

    /// Mutable access to every record, in no particular order
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.slots.iter_mut().map(|(_, slot)| &mut slot.node)
    }
}

impl FromIterator<Node> for NodeMap {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut map = NodeMap::new();
        for node in iter {
            map.insert(node);
        }
        map
    }
}

impl Serialize for NodeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes = self.nodes();
        let mut map = serializer.serialize_map(Some(nodes.len()))?;
        for node in nodes {
            map.serialize_entry(&node.context_path, node)?;
        }
        map.end()
    }
}
