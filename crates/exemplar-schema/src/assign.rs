//! # Type Assignment
//!
//! Walks a data document alongside a [`Schema`] and records, for every data
//! node it can pair structurally, the schema type that node will be checked
//! against. Annotations live in a [`TypeAssignment`] side map keyed by
//! [`NodeId`]; the data document itself is never modified.
//!
//! Pairing rules:
//!
//! - The document node pairs with the schema's `DocumentType`.
//! - A map node paired with a `MapType` is recorded, then each of its items
//!   is looked up by key. A match records the item's `MapItemType` and
//!   descends into the item value with the item's value type.
//! - Anything else (an item with no schema key, a map paired with a scalar
//!   type, any array) is left unassigned and descent stops there.
//!
//! Assignment never fails. Turning a missing type into a diagnostic is the
//! checker's job, so the two passes never both report the same node.

use std::collections::BTreeMap;

use exemplar_core::{Document, NodeId, NodeKind, Value, ValueRef};
use tracing::{debug, trace, warn};

use crate::types::{MapType, Schema, Type, TypeId};

/// Types assigned to the nodes of one data document.
#[derive(Debug, Clone)]
pub struct TypeAssignment<'s> {
    schema: &'s Schema,
    types: BTreeMap<NodeId, TypeId>,
}

impl<'s> TypeAssignment<'s> {
    /// An empty assignment against `schema`.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            types: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn type_id(&self, node: NodeId) -> Option<TypeId> {
        self.types.get(&node).copied()
    }

    /// The type assigned to `node`, if any.
    pub fn type_of(&self, node: NodeId) -> Option<&'s Type> {
        self.type_id(node).and_then(|id| self.schema.get(id))
    }

    pub fn is_assigned(&self, node: NodeId) -> bool {
        self.types.contains_key(&node)
    }

    /// All assignments in node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, TypeId)> + '_ {
        self.types.iter().map(|(node, ty)| (*node, *ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// First assignment wins; a conflicting one is logged and dropped.
    fn record(&mut self, node: NodeId, ty: TypeId) {
        match self.types.get(&node) {
            None => {
                self.types.insert(node, ty);
            }
            Some(existing) if *existing == ty => {}
            Some(existing) => {
                warn!(node = %node, kept = %existing, rejected = %ty, "node already has a different type");
            }
        }
    }
}

impl PartialEq for TypeAssignment<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.types == other.types
    }
}

/// Assign `schema`'s types onto `data_doc`.
pub fn assign_types<'s>(data_doc: &Document, schema: &'s Schema) -> TypeAssignment<'s> {
    let mut assignment = TypeAssignment::new(schema);
    assign_types_into(&mut assignment, data_doc);
    assignment
}

/// Assign onto an existing assignment.
///
/// Repeating the same pairing leaves the assignment unchanged.
pub fn assign_types_into(assignment: &mut TypeAssignment<'_>, data_doc: &Document) {
    let schema = assignment.schema();
    let root = data_doc.root();
    debug!(nodes = data_doc.len(), "assigning schema types");

    assignment.record(root, schema.document_id());
    for value in data_doc.values(root) {
        match value {
            ValueRef::Node(node) => {
                assign_node(assignment, schema, data_doc, node, schema.document().root());
            }
            ValueRef::Scalar(_) => trace!("scalar document value; nothing to descend into"),
        }
    }

    debug!(assigned = assignment.len(), "schema types assigned");
}

fn assign_node(
    assignment: &mut TypeAssignment<'_>,
    schema: &Schema,
    doc: &Document,
    node_id: NodeId,
    expected: TypeId,
) {
    let (Some(node), Some(expected_type)) = (doc.get(node_id), schema.get(expected)) else {
        return;
    };
    match (node.kind(), expected_type) {
        (NodeKind::Map { items }, Type::Map(map_type)) => {
            assignment.record(node_id, expected);
            for item in items {
                assign_map_item(assignment, schema, doc, *item, map_type);
            }
        }
        (kind, ty) => {
            trace!(
                node = %node_id,
                position = %node.position(),
                data = kind.name(),
                schema = ty.name(),
                "structural mismatch; not descending"
            );
        }
    }
}

fn assign_map_item(
    assignment: &mut TypeAssignment<'_>,
    schema: &Schema,
    doc: &Document,
    item_id: NodeId,
    map_type: &MapType,
) {
    let Some(item) = doc.get(item_id) else {
        return;
    };
    let NodeKind::MapItem { key, value } = item.kind() else {
        return;
    };
    let Some((item_type_id, item_type)) = schema.find_item(map_type, key) else {
        trace!(key = %key, position = %item.position(), "no schema item for key");
        return;
    };

    assignment.record(item_id, item_type_id);
    if let Value::Node(child) = value {
        assign_node(assignment, schema, doc, *child, item_type.value());
    }
}
