//! # Source Positions
//!
//! Every node remembers where it came from so diagnostics can point at the
//! offending line. Positions are produced by the parser collaborator; this
//! crate only stores and renders them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a node in its source file.
///
/// Both parts are optional: a hand-built tree may know neither, and the YAML
/// bridge only knows the file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    file: Option<String>,
    line: Option<u32>,
}

impl Position {
    /// A position with a known file and 1-based line.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// A position that only knows its file.
    pub fn in_file(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            line: None,
        }
    }

    /// A position that only knows its line.
    pub fn at_line(line: u32) -> Self {
        Self {
            file: None,
            line: Some(line),
        }
    }

    /// A position with no information at all.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// Returns true if neither file nor line is known.
    pub fn is_unknown(&self) -> bool {
        self.file.is_none() && self.line.is_none()
    }

    /// The short form used in diagnostics: `file:line`, `file`, `line N`, or `?`.
    pub fn as_compact_string(&self) -> String {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.clone(),
            (None, Some(line)) => format!("line {line}"),
            (None, None) => "?".to_string(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_compact_string())
    }
}
