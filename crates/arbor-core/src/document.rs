//! Flat node table owned by the document model.
//!
//! Nodes are stored in an arena and addressed by [`NodeKey`]; the nested [`Node`] shape is only
//! used at the edges (decoding and re-exporting a document). Rendered topics refer back to nodes by
//! id and resolve them through this table, so visual elements can be rebuilt or dropped without
//! touching the data.

use crate::node::{Node, NodeData};
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    // Id uniqueness is assumed, not enforced: the first node registered under an id wins.
    index: FxHashMap<String, NodeKey>,
    root: NodeKey,
}

impl Document {
    pub fn from_root(root: Node) -> Self {
        let built = Self::build(root, |node| {
            let Node { data, children } = node;
            Ok::<_, Infallible>((data, children))
        });
        match built {
            Ok(doc) => doc,
            Err(never) => match never {},
        }
    }

    /// Decodes a document from JSON.
    ///
    /// Accepts either a bare root node or an object wrapping it under `nodeData`. Nesting depth is
    /// not limited; the tree is built without recursion.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let value = Value::deserialize(&mut de)?;
        de.end()?;

        let root_value = match value {
            Value::Object(mut map) => match map.remove("nodeData") {
                Some(inner) => inner,
                None => Value::Object(map),
            },
            other => other,
        };
        if !root_value.is_object() {
            return Err(Error::InvalidDocument {
                message: "expected a node object at the document root".to_string(),
            });
        }
        Self::build(root_value, split_node_value)
    }

    /// Inserts `root` and its descendants in preorder, so keys match a depth-first walk.
    fn build<T, E>(
        root: T,
        mut split: impl FnMut(T) -> std::result::Result<(NodeData, Vec<T>), E>,
    ) -> std::result::Result<Self, E> {
        let mut doc = Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            root: NodeKey(0),
        };
        let mut stack = vec![(root, None)];
        while let Some((item, parent)) = stack.pop() {
            let (data, children) = split(item)?;
            let key = doc.insert(data, parent, children.len());
            stack.extend(children.into_iter().rev().map(|c| (c, Some(key))));
        }
        Ok(doc)
    }

    fn insert(&mut self, data: NodeData, parent: Option<NodeKey>, capacity: usize) -> NodeKey {
        let key = NodeKey(self.nodes.len());
        if self.index.contains_key(&data.id) {
            tracing::warn!(id = %data.id, "duplicate node id; lookups resolve to the first node");
        } else {
            self.index.insert(data.id.clone(), key);
        }
        self.nodes.push(NodeEntry {
            data,
            parent,
            children: Vec::with_capacity(capacity),
        });
        if let Some(entry) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            entry.children.push(key);
        }
        key
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, key: NodeKey) -> Option<&NodeData> {
        self.nodes.get(key.0).map(|e| &e.data)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut NodeData> {
        self.nodes.get_mut(key.0).map(|e| &mut e.data)
    }

    pub fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    pub fn by_id(&self, id: &str) -> Option<&NodeData> {
        self.key_of(id).and_then(|k| self.get(k))
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key.0)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key.0).and_then(|e| e.parent)
    }

    /// Replaces a node's topic text. Returns the previous text.
    pub fn set_topic(&mut self, key: NodeKey, topic: impl Into<String>) -> Option<String> {
        let data = self.get_mut(key)?;
        Some(std::mem::replace(&mut data.topic, topic.into()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &NodeData)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeKey(i), &e.data))
    }

    /// Rebuilds the nested representation starting at `key`.
    pub fn to_tree(&self, key: NodeKey) -> Option<Node> {
        self.nodes.get(key.0)?;
        let mut order = Vec::new();
        let mut stack = vec![key];
        while let Some(cur) = stack.pop() {
            order.push(cur);
            stack.extend(self.children(cur).iter().copied());
        }

        // Descendants come after their ancestors in `order`, so walking it backwards finishes
        // every child before its parent.
        let mut built: FxHashMap<NodeKey, Node> = FxHashMap::default();
        for cur in order.into_iter().rev() {
            let Some(entry) = self.nodes.get(cur.0) else {
                continue;
            };
            let children = entry
                .children
                .iter()
                .filter_map(|c| built.remove(c))
                .collect();
            built.insert(
                cur,
                Node {
                    data: entry.data.clone(),
                    children,
                },
            );
        }
        built.remove(&key)
    }
}

/// Splits one decoded node object into its own fields and its raw children.
fn split_node_value(value: Value) -> Result<(NodeData, Vec<Value>)> {
    let Value::Object(mut map) = value else {
        return Err(Error::InvalidDocument {
            message: "expected every child to be a node object".to_string(),
        });
    };
    let children = match map.remove("children") {
        None => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::InvalidDocument {
                message: "node children must be an array".to_string(),
            });
        }
    };
    let data: NodeData = serde_json::from_value(Value::Object(map))?;
    Ok((data, children))
}
