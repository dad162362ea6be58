//! # exemplar-core — Node Model for Configuration Documents
//!
//! This crate defines the tree that every other exemplar crate walks: a
//! document of maps, map items, arrays, array items and scalars, where each
//! node carries the source [`Position`] it was parsed from.
//!
//! ## Key Design Principles
//!
//! 1. **Arena, not pointers.** A [`Document`] owns all of its nodes in one
//!    arena and hands out [`NodeId`] indices. Anything that wants to annotate
//!    nodes (types, diagnostics) keeps its own side map keyed by `NodeId`,
//!    so the node model stays free of schema concerns.
//!
//! 2. **Closed variant families.** [`NodeKind`] and [`Scalar`] are plain
//!    enums matched exhaustively at every traversal site. Adding a node kind
//!    is a compile error everywhere it is not yet handled.
//!
//! 3. **Construction is validated once.** [`DocumentBuilder`] rejects
//!    dangling ids, nodes attached to two parents, and children of the wrong
//!    kind. A finished `Document` is immutable.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `exemplar-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod node;
pub mod position;
pub mod scalar;
pub mod yaml;

// Re-export primary types for ergonomic imports.
pub use error::NodeError;
pub use node::{Document, DocumentBuilder, Node, NodeId, NodeKind, Value, ValueRef};
pub use position::Position;
pub use scalar::{Key, Scalar, ScalarKind};
