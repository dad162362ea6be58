//! # YAML Bridge
//!
//! Builds a [`Document`] from a `serde_yaml` value tree. `serde_yaml` does
//! not expose line numbers, so every node is positioned at its file only.
//! Callers that need line-accurate diagnostics drive [`DocumentBuilder`]
//! from a position-tracking parser instead.
//!
//! Conversion rules:
//!
//! - Mappings become maps; keys must be strings, integers, or booleans.
//! - Sequences become arrays.
//! - Integers that fit in `i64` become `Int`. Larger integers that
//!   `serde_yaml` still reads as integers (up to `u64::MAX`) are rejected with
//!   `IntegerOutOfRange` rather than widened to `Float`.
//! - Other numbers become `Float`, including integers beyond `u64::MAX`,
//!   which `serde_yaml` itself parses as floats.
//! - Tags are ignored and the inner value converted.

use serde_yaml::Value as Yaml;

use crate::error::NodeError;
use crate::node::{Document, DocumentBuilder, Value};
use crate::position::Position;
use crate::scalar::{Key, Scalar};

/// Convert a parsed YAML value into a document positioned in `file`.
pub fn document_from_yaml(yaml: &Yaml, file: &str) -> Result<Document, NodeError> {
    let position = Position::in_file(file);
    let mut builder = DocumentBuilder::new();
    let value = convert(&mut builder, yaml, &position)?;
    builder.finish(position, value)
}

/// Parse YAML source and convert it into a document positioned in `file`.
pub fn document_from_yaml_str(source: &str, file: &str) -> Result<Document, NodeError> {
    let yaml: Yaml = serde_yaml::from_str(source).map_err(|e| NodeError::InvalidYaml {
        file: file.to_string(),
        reason: e.to_string(),
    })?;
    document_from_yaml(&yaml, file)
}

fn convert(
    builder: &mut DocumentBuilder,
    yaml: &Yaml,
    position: &Position,
) -> Result<Value, NodeError> {
    match yaml {
        Yaml::Null => Ok(Value::Scalar(Scalar::Null)),
        Yaml::Bool(b) => Ok(Value::Scalar(Scalar::Bool(*b))),
        Yaml::Number(n) => {
            let scalar = if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                Scalar::Float(f)
            } else {
                return Err(NodeError::IntegerOutOfRange {
                    position: position.clone(),
                    value: n.to_string(),
                });
            };
            Ok(Value::Scalar(scalar))
        }
        Yaml::String(s) => Ok(Value::Scalar(Scalar::String(s.clone()))),
        Yaml::Sequence(seq) => {
            let mut items = Vec::with_capacity(seq.len());
            for element in seq {
                let value = convert(builder, element, position)?;
                items.push(builder.array_item(position.clone(), value)?);
            }
            Ok(Value::Node(builder.array(position.clone(), items)?))
        }
        Yaml::Mapping(mapping) => {
            let mut items = Vec::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = convert_key(k, position)?;
                let value = convert(builder, v, position)?;
                items.push(builder.map_item(position.clone(), key, value)?);
            }
            Ok(Value::Node(builder.map(position.clone(), items)?))
        }
        Yaml::Tagged(tagged) => convert(builder, &tagged.value, position),
    }
}

fn convert_key(yaml: &Yaml, position: &Position) -> Result<Key, NodeError> {
    match yaml {
        Yaml::String(s) => Ok(Key::String(s.clone())),
        Yaml::Bool(b) => Ok(Key::Bool(*b)),
        Yaml::Number(n) => n.as_i64().map(Key::Int).ok_or_else(|| NodeError::UnsupportedKey {
            position: position.clone(),
            reason: format!("non-integer number {n}"),
        }),
        Yaml::Tagged(tagged) => convert_key(&tagged.value, position),
        Yaml::Null => Err(NodeError::UnsupportedKey {
            position: position.clone(),
            reason: "null".to_string(),
        }),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(NodeError::UnsupportedKey {
            position: position.clone(),
            reason: "collection".to_string(),
        }),
    }
}
