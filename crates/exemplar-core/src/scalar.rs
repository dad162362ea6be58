//! # Scalars and Map Keys
//!
//! Leaf values of a document and the keys that index map items. The set of
//! primitive kinds is closed: string, int, float, bool and null.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime kind of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
    Null,
}

impl ScalarKind {
    /// Lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Null => ScalarKind::Null,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int(_) => ScalarKind::Int,
            Self::Float(_) => ScalarKind::Float,
            Self::String(_) => ScalarKind::String,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Key of a map item.
///
/// Keys compare by value; string keys are case-sensitive. Floats and nulls
/// are not keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    String(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(Scalar::from("x").kind(), ScalarKind::String);
        assert_eq!(Scalar::from(7i64).kind(), ScalarKind::Int);
        assert_eq!(Scalar::from(1.5).kind(), ScalarKind::Float);
        assert_eq!(Scalar::from(true).kind(), ScalarKind::Bool);
        assert_eq!(Scalar::Null.kind(), ScalarKind::Null);
    }

    #[test]
    fn test_kind_display_is_lowercase() {
        assert_eq!(ScalarKind::String.to_string(), "string");
        assert_eq!(ScalarKind::Int.to_string(), "int");
    }

    #[test]
    fn test_key_equality_is_case_sensitive() {
        assert_eq!(Key::from("port"), Key::from("port"));
        assert_ne!(Key::from("port"), Key::from("Port"));
        assert_ne!(Key::from("1"), Key::from(1i64));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::from("name").to_string(), "name");
        assert_eq!(Key::from(42i64).to_string(), "42");
        assert_eq!(Key::from(false).to_string(), "false");
    }
}
