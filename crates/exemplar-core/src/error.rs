//! # Error Types — Node Model Construction
//!
//! Errors raised while assembling a [`Document`](crate::Document), either by
//! hand through [`DocumentBuilder`](crate::DocumentBuilder) or through the
//! YAML bridge. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.

use thiserror::Error;

use crate::node::NodeId;
use crate::position::Position;

/// Error while assembling a document tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    /// The id does not belong to the builder's arena.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The node already has a parent. Trees do not share subtrees.
    #[error("node {node} is already attached to a parent")]
    AlreadyAttached {
        /// The node that was attached twice.
        node: NodeId,
    },

    /// A child of the wrong kind was handed to a container.
    #[error("{parent} cannot contain {child} ({node})")]
    InvalidChild {
        /// Kind name of the container being built.
        parent: &'static str,
        /// Kind name of the rejected child.
        child: &'static str,
        /// The rejected child.
        node: NodeId,
    },

    /// A YAML mapping key that has no [`Key`](crate::Key) representation.
    #[error("unsupported map key at {position}: {reason}")]
    UnsupportedKey {
        /// Where the mapping with the offending key was found.
        position: Position,
        /// What kind of key was found.
        reason: String,
    },

    /// A YAML integer outside the `i64` range of [`Scalar::Int`](crate::Scalar).
    #[error("integer {value} at {position} does not fit in a 64-bit signed integer")]
    IntegerOutOfRange {
        /// Where the integer was found.
        position: Position,
        /// The integer as written.
        value: String,
    },

    /// The YAML source could not be parsed.
    #[error("invalid YAML in '{file}': {reason}")]
    InvalidYaml {
        /// File name the source was read from.
        file: String,
        /// Parser message.
        reason: String,
    },
}
