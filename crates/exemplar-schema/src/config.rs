//! # Schema Configuration
//!
//! Knobs for [`SchemaBuilder`](crate::SchemaBuilder). The defaults accept
//! exactly string and int defaults and reject duplicate schema keys.
//!
//! ```yaml
//! duplicate_keys: first_match   # or: reject
//! extended_scalars: true        # also accept bool and float defaults
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// What the builder does when one schema map repeats a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Fail with `SchemaError::DuplicateSchemaKey`.
    #[default]
    Reject,
    /// Keep the first definition and drop later repeats.
    FirstMatch,
}

/// Options for building a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Accept bool and float schema defaults in addition to string and int.
    pub extended_scalars: bool,
}

impl SchemaConfig {
    /// Load a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidConfig` for malformed YAML or unknown fields.
    pub fn from_yaml_str(source: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(source).map_err(|e| SchemaError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn with_extended_scalars(mut self, enabled: bool) -> Self {
        self.extended_scalars = enabled;
        self
    }
}
