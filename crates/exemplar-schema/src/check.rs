//! # Type Checking
//!
//! Compares every node of an assigned data document with the type recorded
//! for it and collects the mismatches as [`Violation`]s. Checking never stops
//! at the first problem: a single pass yields the complete report.
//!
//! ## Rules
//!
//! - **Map**: every item key must be declared by the map's `MapType`. An
//!   undeclared item is reported once and not descended into. A map with no
//!   assigned `MapType` declares nothing.
//! - **Map item, scalar value**: the value's kind must equal the declared
//!   scalar kind.
//! - **Map item, map value**: descends when a map is declared, otherwise the
//!   item is reported as a kind mismatch.
//! - **Map item, array value**: always a kind mismatch; schemas cannot
//!   declare arrays.
//! - **Array / array item**: not checked.
//! - **Document**: delegates to its value when that is a map or an array.
//!   A scalar or empty document is never reported, whatever the schema root.
//!
//! An item without an assigned type is never reported a second time; the
//! owning map has already reported it as undeclared.
//!
//! Violations are ordered pre-order: parent before children, siblings in
//! source order.

use std::fmt;

use exemplar_core::{Document, Key, NodeId, NodeKind, Position, ScalarKind, Value};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::assign::TypeAssignment;
use crate::types::{MapType, Schema, Type, TypeId};

/// The runtime shape of a value, as named in violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar(ScalarKind),
    Map,
    Array,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Map => f.write_str("map"),
            Self::Array => f.write_str("array"),
        }
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What went wrong at one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The map item's key is not declared in the schema map.
    UndeclaredItem { key: Key },
    /// The map item's value has a different shape than declared.
    TypeMismatch {
        key: Key,
        actual: Shape,
        expected: Shape,
    },
}

/// One reported mismatch, anchored at the offending node's position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub position: Position,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.position.as_compact_string();
        match &self.kind {
            ViolationKind::UndeclaredItem { key } => {
                write!(f, "Map item '{key}' at {position} is not defined in schema")
            }
            ViolationKind::TypeMismatch {
                key,
                actual,
                expected,
            } => write!(
                f,
                "Map item '{key}' at {position} was type {actual} when {expected} was expected."
            ),
        }
    }
}

/// The result of checking one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeCheck {
    violations: Vec<Violation>,
}

impl TypeCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any violation was found. A run passes iff this is false.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// One rendered string per violation, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Append all of `other`'s violations after this check's.
    pub fn merge(&mut self, other: TypeCheck) {
        self.violations.extend(other.violations);
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    fn push(&mut self, position: &Position, kind: ViolationKind) {
        self.violations.push(Violation {
            position: position.clone(),
            kind,
        });
    }
}

impl fmt::Display for TypeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl IntoIterator for TypeCheck {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

/// Check `data_doc` against the types recorded in `assignment`.
///
/// An empty assignment is valid input: every map item is then reported as
/// undeclared.
pub fn check(data_doc: &Document, assignment: &TypeAssignment<'_>) -> TypeCheck {
    let checker = Checker {
        doc: data_doc,
        assignment,
        schema: assignment.schema(),
    };
    let mut report = TypeCheck::new();
    checker.check_document(&mut report);
    debug!(violations = report.len(), "type check complete");
    report
}

struct Checker<'a, 's> {
    doc: &'a Document,
    assignment: &'a TypeAssignment<'s>,
    schema: &'s Schema,
}

impl Checker<'_, '_> {
    fn check_document(&self, report: &mut TypeCheck) {
        let root_id = self.doc.root();
        let Some(root) = self.doc.get(root_id) else {
            return;
        };
        match root.kind() {
            NodeKind::Document {
                value: Value::Node(child),
            } => self.check_container(*child, report),
            NodeKind::Document { .. } => trace!("scalar document value; nothing to check"),
            NodeKind::Map { .. }
            | NodeKind::MapItem { .. }
            | NodeKind::Array { .. }
            | NodeKind::ArrayItem { .. } => {}
        }
    }

    /// Maps are checked; arrays are not.
    fn check_container(&self, node_id: NodeId, report: &mut TypeCheck) {
        let Some(node) = self.doc.get(node_id) else {
            return;
        };
        match node.kind() {
            NodeKind::Map { items } => self.check_map(node_id, items, report),
            NodeKind::Array { .. } | NodeKind::ArrayItem { .. } => {
                trace!(node = %node_id, "arrays are not type checked");
            }
            NodeKind::Document { .. } | NodeKind::MapItem { .. } => {}
        }
    }

    fn check_map(&self, map_id: NodeId, items: &[NodeId], report: &mut TypeCheck) {
        let map_type: Option<&MapType> = match self.assignment.type_of(map_id) {
            Some(Type::Map(map_type)) => Some(map_type),
            _ => None,
        };

        for item_id in items {
            let Some(item) = self.doc.get(*item_id) else {
                continue;
            };
            let NodeKind::MapItem { key, value } = item.kind() else {
                continue;
            };

            let allowed = map_type.is_some_and(|map_type| self.schema.allows_key(map_type, key));
            if !allowed {
                report.push(
                    item.position(),
                    ViolationKind::UndeclaredItem { key: key.clone() },
                );
                continue;
            }
            self.check_map_item(*item_id, key, value, item.position(), report);
        }
    }

    fn check_map_item(
        &self,
        item_id: NodeId,
        key: &Key,
        value: &Value,
        position: &Position,
        report: &mut TypeCheck,
    ) {
        let Some(Type::MapItem(item_type)) = self.assignment.type_of(item_id) else {
            return;
        };
        let Some(expected) = self.expected_shape(item_type.value()) else {
            return;
        };
        let Some(actual) = self.shape_of(value) else {
            return;
        };

        if actual != expected {
            report.push(
                position,
                ViolationKind::TypeMismatch {
                    key: key.clone(),
                    actual,
                    expected,
                },
            );
            return;
        }
        if let Value::Node(child) = value {
            self.check_container(*child, report);
        }
    }

    /// The shape a schema type declares. `None` for ids that are not value types.
    fn expected_shape(&self, type_id: TypeId) -> Option<Shape> {
        match self.schema.get(type_id)? {
            Type::Scalar(scalar) => Some(Shape::Scalar(scalar.kind())),
            Type::Map(_) => Some(Shape::Map),
            Type::MapItem(_) | Type::Document(_) => None,
        }
    }

    /// The runtime shape of a data value. `None` for ids outside the document
    /// or that are not containers.
    fn shape_of(&self, value: &Value) -> Option<Shape> {
        match value {
            Value::Scalar(scalar) => Some(Shape::Scalar(scalar.kind())),
            Value::Node(id) => match self.doc.get(*id)?.kind() {
                NodeKind::Map { .. } => Some(Shape::Map),
                NodeKind::Array { .. } => Some(Shape::Array),
                NodeKind::Document { .. } | NodeKind::MapItem { .. } | NodeKind::ArrayItem { .. } => {
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::assign_types;
    use crate::build::build_schema;
    use exemplar_core::yaml::document_from_yaml_str;
    use exemplar_core::DocumentBuilder;

    fn run(schema_src: &str, data_src: &str) -> TypeCheck {
        let schema =
            build_schema(&document_from_yaml_str(schema_src, "schema.yml").unwrap()).unwrap();
        let doc = document_from_yaml_str(data_src, "values.yml").unwrap();
        let assignment = assign_types(&doc, &schema);
        check(&doc, &assignment)
    }

    #[test]
    fn test_matching_document_passes() {
        let report = run("server:\n  port: 0\n", "server:\n  port: 8080\n");
        assert!(!report.has_violations());
        assert!(report.is_empty());
    }

    #[test]
    fn test_mismatch_and_undeclared() {
        let report = run(
            "name: \"\"\ncount: 0\n",
            "name: x\ncount: y\nextra: 1\n",
        );
        assert_eq!(
            report.messages(),
            vec![
                "Map item 'count' at values.yml was type string when int was expected.",
                "Map item 'extra' at values.yml is not defined in schema",
            ]
        );
    }

    #[test]
    fn test_int_where_string_expected() {
        let report = run("name: \"\"\n", "name: 5\n");
        assert_eq!(report.len(), 1);
        assert!(report.messages()[0].contains("was type int when string was expected"));
    }

    #[test]
    fn test_undeclared_item_is_not_also_a_mismatch() {
        let report = run("name: \"\"\n", "nmae: 5\n");
        assert_eq!(
            report.violations(),
            &[Violation {
                position: Position::in_file("values.yml"),
                kind: ViolationKind::UndeclaredItem {
                    key: Key::from("nmae"),
                },
            }]
        );
    }

    #[test]
    fn test_undeclared_subtree_is_not_descended() {
        let report = run("a: 0\n", "b:\n  c: 1\n  d: 2\n");
        assert_eq!(report.len(), 1);
        assert!(matches!(
            &report.violations()[0].kind,
            ViolationKind::UndeclaredItem { key } if key == &Key::from("b")
        ));
    }

    #[test]
    fn test_all_siblings_are_collected() {
        let report = run(
            "a: 0\nb: 0\nc:\n  d: \"\"\n",
            "a: x\nb: y\nc:\n  d: 1\n  e: 2\nf: 3\n",
        );
        let keys: Vec<String> = report
            .violations()
            .iter()
            .map(|v| match &v.kind {
                ViolationKind::UndeclaredItem { key }
                | ViolationKind::TypeMismatch { key, .. } => key.to_string(),
            })
            .collect();
        assert_eq!(keys, vec!["a", "b", "d", "e", "f"]);
    }

    #[test]
    fn test_map_where_scalar_expected() {
        let report = run("port: 0\n", "port:\n  number: 1\n");
        assert_eq!(
            report.messages(),
            vec!["Map item 'port' at values.yml was type map when int was expected."]
        );
    }

    #[test]
    fn test_scalar_where_map_expected() {
        let report = run("server:\n  port: 0\n", "server: 8080\n");
        assert_eq!(
            report.messages(),
            vec!["Map item 'server' at values.yml was type int when map was expected."]
        );
    }

    #[test]
    fn test_array_value_is_a_mismatch() {
        let report = run("hosts: \"\"\n", "hosts: [a, b]\n");
        assert_eq!(
            report.messages(),
            vec!["Map item 'hosts' at values.yml was type array when string was expected."]
        );
    }

    #[test]
    fn test_null_value_is_a_mismatch() {
        let report = run("name: \"\"\n", "name: null\n");
        assert_eq!(
            report.messages(),
            vec!["Map item 'name' at values.yml was type null when string was expected."]
        );
    }

    #[test]
    fn test_empty_document_passes() {
        let report = run("a: 0\n", "");
        assert!(report.is_empty());
        assert!(!report.has_violations());
    }

    #[test]
    fn test_scalar_document_against_map_schema_passes() {
        assert!(run("a: 0\n", "just text\n").is_empty());
    }

    #[test]
    fn test_map_document_against_scalar_schema() {
        let report = run("text\n", "a: 1\nb: 2\n");
        assert_eq!(
            report.messages(),
            vec![
                "Map item 'a' at values.yml is not defined in schema",
                "Map item 'b' at values.yml is not defined in schema",
            ]
        );
    }

    #[test]
    fn test_scalar_documents_of_same_kind_pass() {
        assert!(run("text\n", "other\n").is_empty());
    }

    #[test]
    fn test_array_document_is_not_checked() {
        assert!(run("a: 0\n", "- 1\n- 2\n").is_empty());
    }

    #[test]
    fn test_unassigned_document_reports_every_item() {
        let schema =
            build_schema(&document_from_yaml_str("a: 0\n", "schema.yml").unwrap()).unwrap();
        let doc = document_from_yaml_str("a: 1\nb: 2\n", "values.yml").unwrap();
        let report = check(&doc, &TypeAssignment::new(&schema));
        assert_eq!(report.len(), 2);
        assert!(report
            .violations()
            .iter()
            .all(|v| matches!(v.kind, ViolationKind::UndeclaredItem { .. })));
    }

    #[test]
    fn test_positions_in_messages() {
        let mut b = DocumentBuilder::new();
        let port = b.map_item(Position::new("values.yml", 2), "port", "eighty").unwrap();
        let debug = b.map_item(Position::new("values.yml", 3), "debug", 1i64).unwrap();
        let map = b.map(Position::new("values.yml", 2), [port, debug]).unwrap();
        let doc = b.finish(Position::new("values.yml", 1), map).unwrap();

        let schema =
            build_schema(&document_from_yaml_str("port: 0\n", "schema.yml").unwrap()).unwrap();
        let report = check(&doc, &assign_types(&doc, &schema));
        assert_eq!(
            report.to_string(),
            "Map item 'port' at values.yml:2 was type string when int was expected.\n\
             Map item 'debug' at values.yml:3 is not defined in schema"
        );
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = run("a: 0\n", "b: 1\n");
        let second = run("a: 0\n", "c: 1\n");
        first.merge(second);
        let keys: Vec<String> = first
            .into_iter()
            .map(|v| match v.kind {
                ViolationKind::UndeclaredItem { key } => key.to_string(),
                other => panic!("unexpected violation {other:?}"),
            })
            .collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_report_serializes() {
        let report = run("count: 0\n", "count: x\n");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "violations": [{
                    "position": {"file": "values.yml", "line": null},
                    "kind": "type_mismatch",
                    "key": "count",
                    "actual": "string",
                    "expected": "int"
                }]
            })
        );
    }
}
