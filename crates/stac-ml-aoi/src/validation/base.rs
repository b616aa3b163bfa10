//! Base validation trait and common utilities
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::fields::FieldName;
use crate::stac::ObjectKind;
use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Validation mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Schema, field placement and the at-least-one-field rule
    Strict,
    /// Schema and field placement
    Partial,
    /// JSON Schema only
    Basic,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Partial => "partial",
            Self::Basic => "basic",
        }
    }

    /// Whether placement rules run in this mode
    pub fn checks_placement(&self) -> bool {
        matches!(self, Self::Strict | Self::Partial)
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "partial" => Ok(Self::Partial),
            "basic" => Ok(Self::Basic),
            other => Err(format!("unknown validation mode '{}', expected strict, partial or basic", other)),
        }
    }
}

/// Validation context carrying the current JSON path
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Current JSON path
    pub path: String,
    pub mode: ValidationMode,
}

impl ValidationContext {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: "$".to_string(),
            mode,
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
            mode: self.mode,
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            mode: self.mode,
        }
    }

    /// Descend along a JSON pointer (`/links/0/ml-aoi:role`)
    ///
    /// Numeric segments are rendered as array indices.
    pub fn at_pointer(&self, pointer: &str) -> Self {
        pointer
            .split('/')
            .skip(1)
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .fold(self.clone(), |context, segment| match segment.parse::<usize>() {
                Ok(index) => context.child_index(index),
                Err(_) => context.child(segment),
            })
    }
}

/// Base trait for document validators
pub trait SchemaValidator {
    /// The type being validated
    type Input;

    /// Validate with all rules
    fn validate(&self, input: &Self::Input) -> ValidationResult<()> {
        let context = ValidationContext::new(ValidationMode::Strict);
        self.validate_with_context(input, &context)
    }

    /// Validate with specific context and mode
    fn validate_with_context(&self, input: &Self::Input, context: &ValidationContext) -> ValidationResult<()>;

    fn validate_partial(&self, input: &Self::Input) -> ValidationResult<()> {
        let context = ValidationContext::new(ValidationMode::Partial);
        self.validate_with_context(input, &context)
    }

    fn validate_basic(&self, input: &Self::Input) -> ValidationResult<()> {
        let context = ValidationContext::new(ValidationMode::Basic);
        self.validate_with_context(input, &context)
    }

    /// Collect validation errors without failing
    fn collect_errors(&self, input: &Self::Input) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Err(error) = self.validate(input) {
            errors.add(error);
        }
        errors
    }
}

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Validate that a string is one of allowed values
    pub fn validate_enum_value(
        value: &str,
        allowed_values: &[&str],
        field_name: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if allowed_values.contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::with_violations(
                &context.path,
                format!("Invalid value for {}: {}", field_name, value),
                vec![ValidationError::create_violation(
                    "enum_value",
                    format!("one of: {}", allowed_values.join(", ")),
                    value.to_string(),
                )],
            ))
        }
    }

    /// Validate that a known field is stored on an object kind it applies to
    ///
    /// `allowed` lists the kinds whose fields may appear in the property bag
    /// at `context`.
    pub fn validate_field_placement(
        field: FieldName,
        allowed: &[ObjectKind],
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if allowed.iter().any(|kind| field.applies_to(*kind)) {
            return Ok(());
        }

        let expected = ObjectKind::ALL
            .iter()
            .filter(|kind| field.applies_to(**kind))
            .map(ObjectKind::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        let actual = allowed.iter().map(ObjectKind::as_str).collect::<Vec<_>>().join(" or ");

        Err(ValidationError::with_violations(
            &context.path,
            format!("Field '{}' is not allowed on {}", field.key(), actual),
            vec![ValidationError::create_violation("field_placement", expected, actual)],
        ))
    }

    /// Validate that a JSON value is an object
    pub fn validate_object<'v>(
        value: &'v Value,
        field_name: &str,
        context: &ValidationContext,
    ) -> ValidationResult<&'v serde_json::Map<String, Value>> {
        value.as_object().ok_or_else(|| {
            ValidationError::with_violations(
                &context.path,
                format!("{} must be an object", field_name),
                vec![ValidationError::create_violation(
                    "type",
                    "object",
                    json_type_name(value),
                )],
            )
        })
    }
}

/// JSON type name used in violation reports
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_context_child() {
        let context = ValidationContext::new(ValidationMode::Strict);
        let child = context.child("properties");
        assert_eq!(child.path, "$.properties");

        let grandchild = child.child("ml-aoi:split");
        assert_eq!(grandchild.path, "$.properties.ml-aoi:split");
    }

    #[test]
    fn test_validation_context_child_index() {
        let context = ValidationContext::new(ValidationMode::Strict).child("links");
        assert_eq!(context.child_index(0).path, "$.links[0]");
    }

    #[test]
    fn test_pointer_to_path() {
        let context = ValidationContext::new(ValidationMode::Basic);
        assert_eq!(context.at_pointer("").path, "$");
        assert_eq!(
            context.at_pointer("/links/2/ml-aoi:role").path,
            "$.links[2].ml-aoi:role"
        );
        assert_eq!(context.at_pointer("/assets/a~1b").path, "$.assets.a/b");

        let batch = context.child_index(3);
        assert_eq!(batch.at_pointer("/properties").path, "$[3].properties");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Strict".parse::<ValidationMode>().unwrap(), ValidationMode::Strict);
        assert_eq!("basic".parse::<ValidationMode>().unwrap(), ValidationMode::Basic);
        assert!("lenient".parse::<ValidationMode>().is_err());
        assert!(!ValidationMode::Basic.checks_placement());
    }

    #[test]
    fn test_validate_enum_value() {
        let context = ValidationContext::new(ValidationMode::Strict);
        assert!(ValidationHelpers::validate_enum_value("train", &["train", "test"], "split", &context).is_ok());
        let err = ValidationHelpers::validate_enum_value("dev", &["train", "test"], "split", &context).unwrap_err();
        assert_eq!(err.schema_violations[0].expected, "one of: train, test");
    }

    #[test]
    fn test_validate_field_placement() {
        let context = ValidationContext::new(ValidationMode::Partial).child("links").child_index(0);
        assert!(ValidationHelpers::validate_field_placement(FieldName::Role, &[ObjectKind::Link], &context).is_ok());

        let err = ValidationHelpers::validate_field_placement(FieldName::ReferenceGrid, &[ObjectKind::Link], &context)
            .unwrap_err();
        assert_eq!(err.path, "$.links[0]");
        assert_eq!(err.message, "Field 'ml-aoi:reference-grid' is not allowed on Link");
        assert_eq!(err.schema_violations[0].expected, "Asset");
    }

    #[test]
    fn test_validate_object() {
        let context = ValidationContext::new(ValidationMode::Basic);
        assert!(ValidationHelpers::validate_object(&json!({}), "document", &context).is_ok());
        let err = ValidationHelpers::validate_object(&json!([1]), "document", &context).unwrap_err();
        assert_eq!(err.schema_violations[0].actual, "array");
    }
}
