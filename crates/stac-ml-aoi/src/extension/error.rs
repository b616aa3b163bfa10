//! Error types for ML-AOI extension access
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::stac::ObjectKind;
use serde_json::Value;
use thiserror::Error;

/// Result type for extension operations
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// Errors raised while reading or writing ML-AOI fields
#[derive(Error, Debug)]
pub enum ExtensionError {
    /// A field record with every field unset
    #[error("ML-AOI extension must provide at least one valid field.")]
    NoFields,

    /// The name does not resolve to a field of the extended object kind
    #[error("Name '{name}' is not a valid ML-AOI field.")]
    InvalidField { name: String, kind: ObjectKind },

    /// The value does not match the field type
    #[error("Invalid value {value} for '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: Value,
        expected: String,
    },

    /// A field record applied to the wrong kind of object
    #[error("Cannot use {fields} with STAC Object {object}")]
    TypeMismatch {
        fields: &'static str,
        object: ObjectKind,
    },

    /// The object does not declare the extension and it was not added
    #[error("{object} '{id}' does not implement the ML-AOI extension ({uri})")]
    NotImplemented {
        object: ObjectKind,
        id: String,
        uri: &'static str,
    },

    #[error("Asset '{key}' not found on {object} '{id}'")]
    AssetNotFound {
        key: String,
        object: ObjectKind,
        id: String,
    },

    #[error("Link {index} not found on {object} '{id}' ({len} links)")]
    LinkNotFound {
        index: usize,
        len: usize,
        object: ObjectKind,
        id: String,
    },

    /// Field record (de)serialization failures
    #[error("Invalid ML-AOI fields: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ExtensionError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, value: Value, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value,
            expected: expected.into(),
        }
    }

    /// Check whether the error is caused by the caller's input rather than
    /// by the state of the extended object
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NoFields
                | Self::InvalidField { .. }
                | Self::InvalidValue { .. }
                | Self::TypeMismatch { .. }
                | Self::Serde(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_messages() {
        let err = ExtensionError::TypeMismatch {
            fields: "AssetFields",
            object: ObjectKind::Item,
        };
        assert_eq!(err.to_string(), "Cannot use AssetFields with STAC Object Item");

        let err = ExtensionError::invalid_value("ml-aoi:reference-grid", json!("yes"), "a boolean");
        assert_eq!(
            err.to_string(),
            "Invalid value \"yes\" for 'ml-aoi:reference-grid': expected a boolean"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_lookup_errors_are_not_input_errors() {
        let err = ExtensionError::AssetNotFound {
            key: "labels".to_string(),
            object: ObjectKind::Item,
            id: "item-1".to_string(),
        };
        assert!(!err.is_input_error());
        assert_eq!(err.to_string(), "Asset 'labels' not found on Item 'item-1'");
    }
}
