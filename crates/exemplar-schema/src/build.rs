//! # Schema Builder
//!
//! Infers a [`Schema`] from a schema-by-example document in one recursive
//! pass over the document tree.
//!
//! ## Dispatch
//!
//! | Schema value     | Type                                          |
//! |------------------|-----------------------------------------------|
//! | map              | `MapType`, one `MapItemType` per item, in order |
//! | string / int     | `ScalarType` of that kind                     |
//! | bool / float     | `ScalarType` if `extended_scalars`, else error |
//! | array            | `UnsupportedSchemaConstruct`                  |
//! | null, other      | `UnrecognizedSchemaConstruct`                 |
//!
//! The document root is more lenient. An empty document, or a root scalar
//! that is not a schema scalar kind, yields an empty `MapType`: the schema
//! declares nothing, so every data map item is undeclared and an empty data
//! document passes. An array root is still unsupported.
//!
//! The literal scalar is kept as the type's default value. It never
//! constrains data values.

use std::collections::HashMap;

use exemplar_core::{Document, Key, NodeId, NodeKind, Position, Scalar, ScalarKind, Value};
use tracing::{debug, trace};

use crate::config::{DuplicateKeyPolicy, SchemaConfig};
use crate::error::SchemaError;
use crate::types::{DocumentType, MapItemType, MapType, ScalarType, Schema, Type, TypeId};

/// Build a schema with the default configuration.
///
/// # Errors
///
/// See [`SchemaBuilder::build`].
pub fn build_schema(schema_doc: &Document) -> Result<Schema, SchemaError> {
    SchemaBuilder::default().build(schema_doc)
}

/// Schema construction with an explicit [`SchemaConfig`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    config: SchemaConfig,
}

impl SchemaBuilder {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Build the type model of `schema_doc`.
    ///
    /// Building is deterministic: the same document always yields a
    /// structurally identical schema.
    ///
    /// # Errors
    ///
    /// - `UnsupportedSchemaConstruct` if an array appears anywhere.
    /// - `UnrecognizedSchemaConstruct` for null map item values, and for bool
    ///   or float ones unless `extended_scalars` is set.
    /// - `DuplicateSchemaKey` if a map repeats a key under
    ///   `DuplicateKeyPolicy::Reject`.
    /// - `MalformedDocument` if the document refers to a node it does not hold.
    pub fn build(&self, schema_doc: &Document) -> Result<Schema, SchemaError> {
        let root_id = schema_doc.root();
        let root = schema_doc
            .get(root_id)
            .ok_or(SchemaError::MalformedDocument { node: root_id })?;
        let NodeKind::Document { value } = root.kind() else {
            return Err(SchemaError::MalformedDocument { node: root_id });
        };
        debug!(nodes = schema_doc.len(), position = %root.position(), "building schema");

        let mut types = Vec::new();
        let root_type = match value {
            Value::Scalar(scalar) if !self.accepts_scalar(scalar.kind()) => {
                debug!(kind = %scalar.kind(), "schema document declares no items");
                push(&mut types, Type::Map(MapType::default()))
            }
            _ => self.build_value(schema_doc, value, root.position(), &mut types)?,
        };
        let document = DocumentType {
            root: root_type,
            position: root.position().clone(),
        };
        let document_id = push(&mut types, Type::Document(document.clone()));

        debug!(types = types.len(), "schema built");
        Ok(Schema {
            types,
            document,
            document_id,
        })
    }

    /// `position` is that of the node holding `value`, used when the value
    /// is a scalar and has no position of its own.
    fn build_value(
        &self,
        doc: &Document,
        value: &Value,
        position: &Position,
        types: &mut Vec<Type>,
    ) -> Result<TypeId, SchemaError> {
        match value {
            Value::Scalar(scalar) => self.build_scalar(scalar, position, types),
            Value::Node(id) => {
                let node = doc
                    .get(*id)
                    .ok_or(SchemaError::MalformedDocument { node: *id })?;
                match node.kind() {
                    NodeKind::Map { items } => self.build_map(doc, items, types),
                    NodeKind::Array { .. } => Err(SchemaError::UnsupportedSchemaConstruct {
                        construct: "array",
                        position: node.position().clone(),
                    }),
                    NodeKind::Document { .. }
                    | NodeKind::MapItem { .. }
                    | NodeKind::ArrayItem { .. } => Err(SchemaError::UnrecognizedSchemaConstruct {
                        kind: node.kind().name().to_string(),
                        position: node.position().clone(),
                    }),
                }
            }
        }
    }

    fn build_scalar(
        &self,
        scalar: &Scalar,
        position: &Position,
        types: &mut Vec<Type>,
    ) -> Result<TypeId, SchemaError> {
        let kind = scalar.kind();
        if !self.accepts_scalar(kind) {
            return Err(SchemaError::UnrecognizedSchemaConstruct {
                kind: kind.to_string(),
                position: position.clone(),
            });
        }
        Ok(push(
            types,
            Type::Scalar(ScalarType {
                kind,
                default_value: scalar.clone(),
            }),
        ))
    }

    fn accepts_scalar(&self, kind: ScalarKind) -> bool {
        match kind {
            ScalarKind::String | ScalarKind::Int => true,
            ScalarKind::Bool | ScalarKind::Float => self.config.extended_scalars,
            ScalarKind::Null => false,
        }
    }

    fn build_map(
        &self,
        doc: &Document,
        items: &[NodeId],
        types: &mut Vec<Type>,
    ) -> Result<TypeId, SchemaError> {
        let mut item_types = Vec::with_capacity(items.len());
        let mut seen: HashMap<&Key, &Position> = HashMap::with_capacity(items.len());

        for item_id in items {
            let node = doc
                .get(*item_id)
                .ok_or(SchemaError::MalformedDocument { node: *item_id })?;
            let NodeKind::MapItem { key, value } = node.kind() else {
                return Err(SchemaError::MalformedDocument { node: *item_id });
            };

            if let Some(first) = seen.get(key) {
                match self.config.duplicate_keys {
                    DuplicateKeyPolicy::Reject => {
                        return Err(SchemaError::DuplicateSchemaKey {
                            key: key.clone(),
                            first: (*first).clone(),
                            duplicate: node.position().clone(),
                        });
                    }
                    DuplicateKeyPolicy::FirstMatch => {
                        // The repeat must still be a valid schema; its types are discarded.
                        let mark = types.len();
                        self.build_value(doc, value, node.position(), types)?;
                        types.truncate(mark);
                        debug!(key = %key, position = %node.position(), "dropping duplicate schema key");
                        continue;
                    }
                }
            }

            let value_type = self.build_value(doc, value, node.position(), types)?;
            trace!(key = %key, value_type = %value_type, "schema item");
            item_types.push(push(
                types,
                Type::MapItem(MapItemType {
                    key: key.clone(),
                    value: value_type,
                    position: node.position().clone(),
                }),
            ));
            seen.insert(key, node.position());
        }

        Ok(push(types, Type::Map(MapType { items: item_types })))
    }
}

fn push(types: &mut Vec<Type>, ty: Type) -> TypeId {
    let id = TypeId(types.len());
    types.push(ty);
    id
}
