//! Validation of STAC documents implementing the ML-AOI extension
//!
//! JSON Schema validation is combined with rules the schema cannot express.
//! Three validation modes are supported:
//!
//! - **Basic**: JSON Schema validation only
//! - **Partial**: Schema + field placement rules
//! - **Strict**: Schema + placement + at least one ML-AOI field
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod ml_aoi;

pub use base::{SchemaValidator, ValidationContext, ValidationHelpers, ValidationMode};
pub use error::{SchemaError, ValidationError, ValidationErrors, ValidationResult, Violation};
pub use ml_aoi::{MlAoiValidator, SCHEMA_PATH_ENV};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Convenience function to create an ML-AOI validator
///
/// # Examples
///
/// ```rust
/// use stac_ml_aoi::validation::{create_ml_aoi_validator, SchemaValidator};
/// use serde_json::json;
///
/// let validator = create_ml_aoi_validator().unwrap();
/// let collection = json!({
///     "type": "Collection",
///     "stac_version": "1.0.0",
///     "stac_extensions": ["https://stac-extensions.github.io/ml-aoi/v0.2.0/schema.json"],
///     "id": "EuroSAT-subset-train",
///     "description": "Training split",
///     "license": "MIT",
///     "extent": {
///         "spatial": {"bbox": [[-180, -90, 180, 90]]},
///         "temporal": {"interval": [[null, null]]}
///     },
///     "links": [],
///     "ml-aoi:split": "train"
/// });
///
/// assert!(validator.validate(&collection).is_ok());
/// ```
pub fn create_ml_aoi_validator() -> Result<MlAoiValidator, SchemaError> {
    MlAoiValidator::new()
}

/// Validation configuration for batch operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub mode: ValidationMode,
    /// Stop at the first invalid document
    pub fail_fast: bool,
    /// Maximum number of errors to collect (0 = unlimited)
    pub max_errors: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Strict,
            fail_fast: false,
            max_errors: 0,
        }
    }
}

impl ValidationConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn partial() -> Self {
        Self {
            mode: ValidationMode::Partial,
            ..Self::default()
        }
    }

    pub fn basic() -> Self {
        Self {
            mode: ValidationMode::Basic,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    fn limit_reached(&self, collected: usize) -> bool {
        self.max_errors > 0 && collected >= self.max_errors
    }
}

/// Validate several documents; error paths are prefixed with the document index
pub fn validate_documents_batch(documents: &[Value], config: &ValidationConfig) -> Result<(), ValidationErrors> {
    let validator = create_ml_aoi_validator().map_err(|e| {
        ValidationErrors::from(ValidationError::new("$", format!("Failed to create validator: {}", e)))
    })?;

    let mut errors = ValidationErrors::new();
    let context = ValidationContext::new(config.mode);

    for (i, document) in documents.iter().enumerate() {
        let document_errors = validator.collect_errors_with_context(document, &context.child_index(i));
        if document_errors.is_empty() {
            continue;
        }

        for error in document_errors {
            if config.limit_reached(errors.len()) {
                break;
            }
            errors.add(error);
        }

        if config.fail_fast || config.limit_reached(errors.len()) {
            break;
        }
    }

    errors.into_result()
}
