//! # exemplar-schema — Schema-by-Example Type Checking
//!
//! Validates a configuration document against a second document that acts
//! as its schema by example: the schema's keys define which items may
//! appear, and its default values define the primitive type of each item.
//!
//! ## Pipeline
//!
//! ```text
//! schema Document ──build_schema()──▶ Schema (type arena, immutable)
//!                                       │
//! data Document ──────assign_types()────┴──▶ TypeAssignment (NodeId → TypeId)
//!                                                   │
//!                                  check() ─────────┴──▶ TypeCheck (violations)
//! ```
//!
//! - [`build`]: one recursive pass from a schema document to a [`Schema`].
//!   Arrays and unknown scalar kinds reject the whole schema.
//! - [`assign`]: pairs data nodes with schema types by map-item key. Never
//!   fails; nodes it cannot pair stay unassigned.
//! - [`check`]: compares each data node with its assigned type and collects
//!   every violation in one pass.
//! - [`validate`]: the three steps above as a single call.
//!
//! ## Crate Policy
//!
//! - Depends only on `exemplar-core` internally.
//! - A [`Schema`] is never mutated after construction and is `Send + Sync`,
//!   so one schema may serve many concurrent validations.
//! - Validation findings are data in [`TypeCheck`], never `Err`. Only schema
//!   construction returns errors.

pub mod assign;
pub mod build;
pub mod check;
pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use assign::{assign_types, assign_types_into, TypeAssignment};
pub use build::{build_schema, SchemaBuilder};
pub use check::{check, Shape, TypeCheck, Violation, ViolationKind};
pub use config::{DuplicateKeyPolicy, SchemaConfig};
pub use error::SchemaError;
pub use types::{DocumentType, MapItemType, MapType, ScalarType, Schema, Type, TypeId};
pub use validate::{validate, validate_yaml_str};
