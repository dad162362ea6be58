//! # Schema Errors
//!
//! Construction-time failures. Every variant rejects the whole schema; once
//! [`build_schema`](crate::build_schema) has returned `Ok`, none of these can
//! occur for that schema again.

use exemplar_core::{Key, NodeError, NodeId, Position};
use thiserror::Error;

/// Error building a schema from a schema document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The schema uses a construct the type model cannot express yet.
    #[error("{construct}s are currently not supported in schema (at {position})")]
    UnsupportedSchemaConstruct {
        /// Name of the construct, e.g. "array".
        construct: &'static str,
        /// Where the construct appears in the schema document.
        position: Position,
    },

    /// A schema value whose kind maps to no type.
    #[error("schema value at {position} is {kind}, which does not match any known type")]
    UnrecognizedSchemaConstruct {
        /// Kind name of the offending value, e.g. "null".
        kind: String,
        /// Where the value appears in the schema document.
        position: Position,
    },

    /// The same key appears twice in one schema map.
    #[error("schema key '{key}' at {duplicate} is already defined at {first}")]
    DuplicateSchemaKey {
        /// The repeated key.
        key: Key,
        /// Position of the first definition.
        first: Position,
        /// Position of the rejected repeat.
        duplicate: Position,
    },

    /// The document arena does not hold the node a parent refers to.
    #[error("malformed schema document: missing or misplaced {node}")]
    MalformedDocument {
        /// The id that could not be resolved.
        node: NodeId,
    },

    /// The schema configuration could not be parsed.
    #[error("invalid schema configuration: {reason}")]
    InvalidConfig {
        /// Parser message.
        reason: String,
    },

    /// A schema or data document could not be assembled.
    #[error("document error: {0}")]
    Document(#[from] NodeError),
}
