//! # Document Trees
//!
//! A [`Document`] is an arena of [`Node`]s rooted at a single document node.
//! Containers refer to their children by [`NodeId`], so a node can be
//! annotated from the outside without touching the tree.
//!
//! ## Shape
//!
//! ```text
//! Document ── value ──▶ Map ── items ──▶ MapItem(key) ── value ──▶ scalar | Map | Array
//!                       Array ─ items ─▶ ArrayItem ───── value ──▶ scalar | Map | Array
//! ```
//!
//! Containers hold only their item kind: a Map holds MapItems, an Array holds
//! ArrayItems. Item and document values are either a [`Scalar`] or a nested
//! Map or Array. Map keys are not required to be unique; source order is kept.
//!
//! Trees are assembled bottom-up with [`DocumentBuilder`]: children first,
//! then the container that owns them, and finally the document.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::position::Position;
use crate::scalar::{Key, Scalar};

/// Index of a node within its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// The value held by a document, map item, or array item.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Node(NodeId),
}

impl Value {
    pub fn as_value_ref(&self) -> ValueRef<'_> {
        match self {
            Self::Scalar(s) => ValueRef::Scalar(s),
            Self::Node(id) => ValueRef::Node(*id),
        }
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::from(s))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Int(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

/// Borrowed view of a direct child value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    Scalar(&'a Scalar),
    Node(NodeId),
}

/// The variant-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document { value: Value },
    Map { items: Vec<NodeId> },
    MapItem { key: Key, value: Value },
    Array { items: Vec<NodeId> },
    ArrayItem { value: Value },
}

impl NodeKind {
    /// Lowercase kind name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document { .. } => "document",
            Self::Map { .. } => "map",
            Self::MapItem { .. } => "map item",
            Self::Array { .. } => "array",
            Self::ArrayItem { .. } => "array item",
        }
    }
}

/// One node of a document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    position: Position,
    kind: NodeKind,
}

impl Node {
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The held value of a document, map item, or array item.
    pub fn value(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Document { value }
            | NodeKind::MapItem { value, .. }
            | NodeKind::ArrayItem { value } => Some(value),
            NodeKind::Map { .. } | NodeKind::Array { .. } => None,
        }
    }

    /// The key of a map item.
    pub fn key(&self) -> Option<&Key> {
        match &self.kind {
            NodeKind::MapItem { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The item ids of a map or array; empty for every other kind.
    pub fn items(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Map { items } | NodeKind::Array { items } => items.as_slice(),
            _ => &[],
        }
    }
}

/// An immutable document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Id of the document node itself.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node. Returns `None` for ids from another document.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The value wrapped by the document node.
    pub fn value(&self) -> Option<&Value> {
        self.get(self.root).and_then(Node::value)
    }

    /// Direct child values of a node, in source order.
    ///
    /// Containers yield one `ValueRef::Node` per item; documents and items
    /// yield their single held value.
    pub fn values(&self, id: NodeId) -> Vec<ValueRef<'_>> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        match node.kind() {
            NodeKind::Map { items } | NodeKind::Array { items } => {
                items.iter().map(|item| ValueRef::Node(*item)).collect()
            }
            NodeKind::Document { value }
            | NodeKind::MapItem { value, .. }
            | NodeKind::ArrayItem { value } => vec![value.as_value_ref()],
        }
    }

    pub fn position(&self, id: NodeId) -> Option<&Position> {
        self.get(id).map(Node::position)
    }

    /// Number of nodes in the arena, including the document node.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a finished document contains at least its own node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Bottom-up constructor for [`Document`].
///
/// Each method validates its children and returns the id of the new node.
/// A child may be attached to exactly one parent.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    nodes: Vec<Node>,
    attached: Vec<bool>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a map item holding a scalar or a previously built map or array.
    pub fn map_item(
        &mut self,
        position: Position,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<NodeId, NodeError> {
        let value = value.into();
        self.claim_value("map item", &value)?;
        Ok(self.push(
            position,
            NodeKind::MapItem {
                key: key.into(),
                value,
            },
        ))
    }

    /// Add a map over previously built map items, in the given order.
    pub fn map(
        &mut self,
        position: Position,
        items: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, NodeError> {
        let items: Vec<NodeId> = items.into_iter().collect();
        self.claim_items("map", &items, |kind| matches!(kind, NodeKind::MapItem { .. }))?;
        Ok(self.push(position, NodeKind::Map { items }))
    }

    /// Add an array item holding a scalar or a previously built map or array.
    pub fn array_item(
        &mut self,
        position: Position,
        value: impl Into<Value>,
    ) -> Result<NodeId, NodeError> {
        let value = value.into();
        self.claim_value("array item", &value)?;
        Ok(self.push(position, NodeKind::ArrayItem { value }))
    }

    /// Add an array over previously built array items, in the given order.
    pub fn array(
        &mut self,
        position: Position,
        items: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, NodeError> {
        let items: Vec<NodeId> = items.into_iter().collect();
        self.claim_items("array", &items, |kind| {
            matches!(kind, NodeKind::ArrayItem { .. })
        })?;
        Ok(self.push(position, NodeKind::Array { items }))
    }

    /// Wrap `value` in the document node and seal the arena.
    pub fn finish(
        mut self,
        position: Position,
        value: impl Into<Value>,
    ) -> Result<Document, NodeError> {
        let value = value.into();
        self.claim_value("document", &value)?;
        let root = self.push(position, NodeKind::Document { value });
        Ok(Document {
            nodes: self.nodes,
            root,
        })
    }

    fn push(&mut self, position: Position, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { position, kind });
        self.attached.push(false);
        id
    }

    fn kind_of(&self, id: NodeId) -> Result<&NodeKind, NodeError> {
        self.nodes
            .get(id.0)
            .map(Node::kind)
            .ok_or(NodeError::UnknownNode(id))
    }

    fn ensure_detached(&self, id: NodeId) -> Result<(), NodeError> {
        match self.attached.get(id.0) {
            Some(false) => Ok(()),
            Some(true) => Err(NodeError::AlreadyAttached { node: id }),
            None => Err(NodeError::UnknownNode(id)),
        }
    }

    fn mark_attached(&mut self, id: NodeId) {
        if let Some(flag) = self.attached.get_mut(id.0) {
            *flag = true;
        }
    }

    /// Held values may only nest containers, never items or documents.
    fn claim_value(&mut self, parent: &'static str, value: &Value) -> Result<(), NodeError> {
        let Value::Node(id) = value else {
            return Ok(());
        };
        let kind = self.kind_of(*id)?;
        if !matches!(kind, NodeKind::Map { .. } | NodeKind::Array { .. }) {
            return Err(NodeError::InvalidChild {
                parent,
                child: kind.name(),
                node: *id,
            });
        }
        self.ensure_detached(*id)?;
        self.mark_attached(*id);
        Ok(())
    }

    /// Validates every item before claiming any, so a failed call leaves
    /// the builder unchanged.
    fn claim_items(
        &mut self,
        parent: &'static str,
        items: &[NodeId],
        accepts: impl Fn(&NodeKind) -> bool,
    ) -> Result<(), NodeError> {
        let mut seen = HashSet::with_capacity(items.len());
        for id in items {
            let kind = self.kind_of(*id)?;
            if !accepts(kind) {
                return Err(NodeError::InvalidChild {
                    parent,
                    child: kind.name(),
                    node: *id,
                });
            }
            self.ensure_detached(*id)?;
            if !seen.insert(*id) {
                return Err(NodeError::AlreadyAttached { node: *id });
            }
        }
        for id in items {
            self.mark_attached(*id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32) -> Position {
        Position::new("test.yml", line)
    }

    /// `server: {port: 8080}` plus `name: api`.
    fn sample() -> Document {
        let mut b = DocumentBuilder::new();
        let port = b.map_item(pos(3), "port", 8080i64).unwrap();
        let server_map = b.map(pos(3), [port]).unwrap();
        let server = b.map_item(pos(2), "server", server_map).unwrap();
        let name = b.map_item(pos(4), "name", "api").unwrap();
        let root = b.map(pos(1), [server, name]).unwrap();
        b.finish(pos(1), root).unwrap()
    }

    #[test]
    fn test_build_nested_document() {
        let doc = sample();
        assert_eq!(doc.len(), 6);

        let Some(Value::Node(root_map)) = doc.value() else {
            panic!("document should hold a map");
        };
        let map = doc.get(*root_map).unwrap();
        assert_eq!(map.kind().name(), "map");
        let keys: Vec<String> = map
            .items()
            .iter()
            .map(|id| doc.get(*id).unwrap().key().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["server", "name"]);
    }

    #[test]
    fn test_values_enumerates_direct_children() {
        let doc = sample();
        let root_values = doc.values(doc.root());
        assert_eq!(root_values.len(), 1);
        let ValueRef::Node(map) = root_values[0] else {
            panic!("expected node value");
        };
        assert_eq!(doc.values(map).len(), 2);
    }

    #[test]
    fn test_values_of_unknown_id_is_empty() {
        let doc = sample();
        assert!(doc.values(NodeId(999)).is_empty());
        assert!(doc.get(NodeId(999)).is_none());
    }

    #[test]
    fn test_position_is_kept() {
        let doc = sample();
        let root = doc.get(doc.root()).unwrap();
        assert_eq!(root.position().as_compact_string(), "test.yml:1");
    }

    #[test]
    fn test_scalar_document() {
        let doc = DocumentBuilder::new().finish(pos(1), "just text").unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.value(), Some(&Value::from("just text")));
    }

    #[test]
    fn test_duplicate_keys_are_allowed() {
        let mut b = DocumentBuilder::new();
        let a = b.map_item(pos(1), "a", 1i64).unwrap();
        let a2 = b.map_item(pos(2), "a", 2i64).unwrap();
        assert!(b.map(pos(1), [a, a2]).is_ok());
    }

    #[test]
    fn test_map_rejects_non_item_children() {
        let mut b = DocumentBuilder::new();
        let item = b.array_item(pos(1), 1i64).unwrap();
        let err = b.map(pos(1), [item]).unwrap_err();
        assert_eq!(
            err,
            NodeError::InvalidChild {
                parent: "map",
                child: "array item",
                node: item,
            }
        );
    }

    #[test]
    fn test_array_rejects_map_items() {
        let mut b = DocumentBuilder::new();
        let item = b.map_item(pos(1), "k", 1i64).unwrap();
        assert!(matches!(
            b.array(pos(1), [item]),
            Err(NodeError::InvalidChild { parent: "array", .. })
        ));
    }

    #[test]
    fn test_item_value_cannot_be_an_item() {
        let mut b = DocumentBuilder::new();
        let inner = b.map_item(pos(1), "k", 1i64).unwrap();
        assert!(matches!(
            b.map_item(pos(1), "outer", inner),
            Err(NodeError::InvalidChild { parent: "map item", child: "map item", .. })
        ));
    }

    #[test]
    fn test_node_attached_twice_is_rejected() {
        let mut b = DocumentBuilder::new();
        let item = b.map_item(pos(1), "k", 1i64).unwrap();
        b.map(pos(1), [item]).unwrap();
        assert_eq!(
            b.map(pos(2), [item]),
            Err(NodeError::AlreadyAttached { node: item })
        );
    }

    #[test]
    fn test_same_item_twice_in_one_map_is_rejected() {
        let mut b = DocumentBuilder::new();
        let item = b.map_item(pos(1), "k", 1i64).unwrap();
        assert_eq!(
            b.map(pos(1), [item, item]),
            Err(NodeError::AlreadyAttached { node: item })
        );
    }

    #[test]
    fn test_failed_container_leaves_children_detached() {
        let mut b = DocumentBuilder::new();
        let good = b.map_item(pos(1), "k", 1i64).unwrap();
        let bad = b.array_item(pos(2), 1i64).unwrap();
        assert!(b.map(pos(1), [good, bad]).is_err());
        assert!(b.map(pos(1), [good]).is_ok());
    }

    #[test]
    fn test_unknown_child_is_rejected() {
        let mut b = DocumentBuilder::new();
        assert_eq!(
            b.map(pos(1), [NodeId(5)]),
            Err(NodeError::UnknownNode(NodeId(5)))
        );
    }
}
