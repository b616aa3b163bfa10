//! ML-AOI document validation
//!
//! Documents are checked in three layers, selected by [`ValidationMode`]:
//!
//! - **Basic**: the document is a STAC Item or Collection and conforms to the
//!   ML-AOI JSON Schema (draft-07)
//! - **Partial**: known ML-AOI fields only appear on object kinds they apply to
//! - **Strict**: the document carries at least one ML-AOI field
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::extension::ExtensionError;
use crate::fields::FieldName;
use crate::stac::ObjectKind;
use crate::validation::base::{json_type_name, SchemaValidator, ValidationContext, ValidationHelpers, ValidationMode};
use crate::validation::error::{SchemaError, ValidationError, ValidationErrors, ValidationResult};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Environment variable overriding the embedded schema
pub const SCHEMA_PATH_ENV: &str = "ML_AOI_SCHEMA_PATH";

const EMBEDDED_SCHEMA: &str = include_str!("../../json-schema/schema.json");

const ITEM_PROPERTY_KINDS: &[ObjectKind] = &[ObjectKind::Item, ObjectKind::Asset];
const COLLECTION_KINDS: &[ObjectKind] = &[ObjectKind::Collection];
const ASSET_KINDS: &[ObjectKind] = &[ObjectKind::Asset];
const LINK_KINDS: &[ObjectKind] = &[ObjectKind::Link];

/// Validator for STAC documents implementing the ML-AOI extension
pub struct MlAoiValidator {
    schema: Arc<Value>,
    compiled: jsonschema::Validator,
}

impl MlAoiValidator {
    /// Create a validator from `ML_AOI_SCHEMA_PATH`, or from the embedded schema
    pub fn new() -> Result<Self, SchemaError> {
        match std::env::var_os(SCHEMA_PATH_ENV) {
            Some(path) => Self::from_path(&PathBuf::from(path)),
            None => Self::embedded(),
        }
    }

    /// Create a validator from the schema shipped with the crate
    pub fn embedded() -> Result<Self, SchemaError> {
        let schema = serde_json::from_str(EMBEDDED_SCHEMA).map_err(|source| SchemaError::Parse {
            path: PathBuf::from("json-schema/schema.json"),
            source,
        })?;
        Self::from_schema(schema)
    }

    /// Load the schema from a file
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = serde_json::from_str(&content).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded ML-AOI schema");
        Self::from_schema(schema)
    }

    pub fn from_schema(schema: Value) -> Result<Self, SchemaError> {
        let compiled = jsonschema::validator_for(&schema).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self {
            schema: Arc::new(schema),
            compiled,
        })
    }

    /// Get the loaded schema
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Collect every error of a document for the mode of `ctx`
    pub fn collect_errors_with_context(&self, document: &Value, ctx: &ValidationContext) -> ValidationErrors {
        let errors = self.errors_with_context(document, ctx);
        debug!(path = %ctx.path, mode = %ctx.mode, errors = errors.len(), "Validated ML-AOI document");
        errors.into()
    }

    fn errors_with_context(&self, document: &Value, ctx: &ValidationContext) -> Vec<ValidationError> {
        let object = match ValidationHelpers::validate_object(document, "STAC document", ctx) {
            Ok(object) => object,
            Err(error) => return vec![error],
        };

        let Some(kind) = ObjectKind::of_document(document) else {
            let found = object
                .get("type")
                .map(|t| t.as_str().map(str::to_string).unwrap_or_else(|| t.to_string()))
                .unwrap_or_else(|| "nothing".to_string());
            return vec![ValidationError::with_violations(
                ctx.child("type").path,
                "ML-AOI fields can only be validated on STAC Items and Collections",
                vec![ValidationError::create_violation(
                    "object_type",
                    "\"Feature\" or \"Collection\"",
                    found,
                )],
            )];
        };

        let mut errors = self.schema_errors(document, ctx);

        if ctx.mode.checks_placement() {
            errors.extend(placement_errors(object, kind, ctx));
        }

        if ctx.mode == ValidationMode::Strict && count_fields(object, kind) == 0 {
            errors.push(ValidationError::with_violations(
                &ctx.path,
                ExtensionError::NoFields.to_string(),
                vec![ValidationError::create_violation(
                    "at_least_one_field",
                    "at least one ML-AOI field",
                    "none",
                )],
            ));
        }

        errors
    }

    fn schema_errors(&self, document: &Value, ctx: &ValidationContext) -> Vec<ValidationError> {
        self.compiled
            .iter_errors(document)
            .map(|error| {
                let location = ctx.at_pointer(&error.instance_path.to_string());
                ValidationError::with_violations(
                    location.path,
                    error.to_string(),
                    vec![ValidationError::create_violation(
                        "json_schema",
                        error.schema_path.to_string(),
                        format!("{} {}", json_type_name(&error.instance), error.instance),
                    )],
                )
            })
            .collect()
    }
}

impl fmt::Debug for MlAoiValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MlAoiValidator")
            .field("schema_id", &self.schema.get("$id").and_then(Value::as_str))
            .finish()
    }
}

/// Property bags of a document, each with the object kinds its fields may belong to
fn property_bags<'a>(
    object: &'a Map<String, Value>,
    kind: ObjectKind,
    ctx: &ValidationContext,
) -> Vec<(&'a Map<String, Value>, &'static [ObjectKind], ValidationContext)> {
    let mut bags = Vec::new();

    match kind {
        ObjectKind::Item => {
            // asset fields may be declared once for all assets of the Item
            if let Some(properties) = object.get("properties").and_then(Value::as_object) {
                bags.push((properties, ITEM_PROPERTY_KINDS, ctx.child("properties")));
            }
        }
        _ => {
            bags.push((object, COLLECTION_KINDS, ctx.clone()));
            if let Some(summaries) = object.get("summaries").and_then(Value::as_object) {
                bags.push((summaries, COLLECTION_KINDS, ctx.child("summaries")));
            }
            if let Some(item_assets) = object.get("item_assets").and_then(Value::as_object) {
                let item_assets_ctx = ctx.child("item_assets");
                for (key, asset) in item_assets {
                    if let Some(asset) = asset.as_object() {
                        bags.push((asset, ASSET_KINDS, item_assets_ctx.child(key)));
                    }
                }
            }
        }
    }

    if let Some(assets) = object.get("assets").and_then(Value::as_object) {
        let assets_ctx = ctx.child("assets");
        for (key, asset) in assets {
            if let Some(asset) = asset.as_object() {
                bags.push((asset, ASSET_KINDS, assets_ctx.child(key)));
            }
        }
    }

    if let Some(links) = object.get("links").and_then(Value::as_array) {
        let links_ctx = ctx.child("links");
        for (index, link) in links.iter().enumerate() {
            if let Some(link) = link.as_object() {
                bags.push((link, LINK_KINDS, links_ctx.child_index(index)));
            }
        }
    }

    bags
}

fn known_fields(bag: &Map<String, Value>) -> impl Iterator<Item = (&String, FieldName)> {
    bag.keys().filter_map(|key| FieldName::from_key(key).map(|field| (key, field)))
}

fn placement_errors(object: &Map<String, Value>, kind: ObjectKind, ctx: &ValidationContext) -> Vec<ValidationError> {
    property_bags(object, kind, ctx)
        .into_iter()
        .flat_map(|(bag, allowed, bag_ctx)| {
            known_fields(bag)
                .filter_map(|(key, field)| {
                    ValidationHelpers::validate_field_placement(field, allowed, &bag_ctx.child(key)).err()
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn count_fields(object: &Map<String, Value>, kind: ObjectKind) -> usize {
    let ctx = ValidationContext::new(ValidationMode::Strict);
    property_bags(object, kind, &ctx)
        .into_iter()
        .map(|(bag, _, _)| known_fields(bag).count())
        .sum()
}

impl SchemaValidator for MlAoiValidator {
    type Input = Value;

    fn validate_with_context(&self, document: &Value, ctx: &ValidationContext) -> ValidationResult<()> {
        match self.errors_with_context(document, ctx).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Every error found in strict mode
    fn collect_errors(&self, document: &Value) -> ValidationErrors {
        self.collect_errors_with_context(document, &ValidationContext::new(ValidationMode::Strict))
    }
}
