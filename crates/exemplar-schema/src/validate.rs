//! # Validation Pipeline
//!
//! The expected call sequence as single calls:
//! `build_schema → assign_types → check`.

use exemplar_core::yaml::document_from_yaml_str;
use exemplar_core::Document;

use crate::assign::assign_types;
use crate::build::SchemaBuilder;
use crate::check::{check, TypeCheck};
use crate::error::SchemaError;
use crate::types::Schema;

impl Schema {
    /// Assign this schema onto `data_doc` and check it.
    ///
    /// The schema is only borrowed, so one schema can validate any number of
    /// documents, including from several threads at once.
    pub fn validate(&self, data_doc: &Document) -> TypeCheck {
        let assignment = assign_types(data_doc, self);
        check(data_doc, &assignment)
    }
}

impl SchemaBuilder {
    /// Build a schema from `schema_doc` with this builder's configuration and
    /// check `data_doc` against it.
    ///
    /// # Errors
    ///
    /// Returns the schema construction error if `schema_doc` is not a valid
    /// schema; no check is performed in that case.
    pub fn validate(
        &self,
        schema_doc: &Document,
        data_doc: &Document,
    ) -> Result<TypeCheck, SchemaError> {
        let schema = self.build(schema_doc)?;
        Ok(schema.validate(data_doc))
    }
}

/// [`SchemaBuilder::validate`] with the default configuration.
///
/// # Errors
///
/// See [`SchemaBuilder::validate`].
pub fn validate(schema_doc: &Document, data_doc: &Document) -> Result<TypeCheck, SchemaError> {
    SchemaBuilder::default().validate(schema_doc, data_doc)
}

/// Parse both documents from YAML and validate. File names are used for
/// positions only; nothing is read from disk.
///
/// # Errors
///
/// Returns `SchemaError::Document` if either source is not valid YAML, or the
/// schema construction error.
pub fn validate_yaml_str(
    schema_source: &str,
    schema_file: &str,
    data_source: &str,
    data_file: &str,
) -> Result<TypeCheck, SchemaError> {
    let schema_doc = document_from_yaml_str(schema_source, schema_file)?;
    let data_doc = document_from_yaml_str(data_source, data_file)?;
    validate(&schema_doc, &data_doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_schema;
    use crate::config::SchemaConfig;
    use exemplar_core::NodeError;

    #[test]
    fn test_validate_yaml_str() {
        let report =
            validate_yaml_str("count: 0\n", "schema.yml", "count: 1\n", "values.yml").unwrap();
        assert!(!report.has_violations());
    }

    #[test]
    fn test_schema_error_short_circuits() {
        let err = validate_yaml_str("list: []\n", "schema.yml", "list: 1\n", "values.yml")
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedSchemaConstruct { .. }));
    }

    #[test]
    fn test_invalid_data_yaml() {
        let err = validate_yaml_str("a: 0\n", "schema.yml", "a: [\n", "values.yml").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Document(NodeError::InvalidYaml { ref file, .. }) if file == "values.yml"
        ));
    }

    #[test]
    fn test_builder_validate_applies_config() {
        let schema_doc = document_from_yaml_str("debug: false\n", "schema.yml").unwrap();
        let data_doc = document_from_yaml_str("debug: 1\n", "values.yml").unwrap();

        let err = validate(&schema_doc, &data_doc).unwrap_err();
        assert!(matches!(err, SchemaError::UnrecognizedSchemaConstruct { .. }));

        let config = SchemaConfig::from_yaml_str("extended_scalars: true\n").unwrap();
        let report = SchemaBuilder::new(config)
            .validate(&schema_doc, &data_doc)
            .unwrap();
        assert_eq!(
            report.messages(),
            vec!["Map item 'debug' at values.yml was type int when bool was expected."]
        );
    }

    #[test]
    fn test_schema_reused_across_documents() {
        let schema_doc = document_from_yaml_str("port: 0\n", "schema.yml").unwrap();
        let schema = build_schema(&schema_doc).unwrap();
        let good = document_from_yaml_str("port: 1\n", "a.yml").unwrap();
        let bad = document_from_yaml_str("port: x\n", "b.yml").unwrap();
        assert!(schema.validate(&good).is_empty());
        assert_eq!(schema.validate(&bad).len(), 1);
    }
}
