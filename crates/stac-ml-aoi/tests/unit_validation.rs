//! Unit tests for ML-AOI document validation
//!
//! Covers the three validation modes, error paths and batch validation.

use serde_json::{json, Value};
use stac_ml_aoi::{
    create_ml_aoi_validator, validate_documents_batch, SchemaValidator, ValidationConfig, ValidationContext,
    ValidationMode, SCHEMA_URI,
};

fn collection() -> Value {
    json!({
        "type": "Collection",
        "stac_version": "1.0.0",
        "stac_extensions": [SCHEMA_URI],
        "id": "EuroSAT-subset-train",
        "description": "EuroSAT train split",
        "license": "MIT",
        "extent": {
            "spatial": {"bbox": [[-7.88, 37.13, 27.91, 58.21]]},
            "temporal": {"interval": [["2015-06-27T10:25:31.456Z", "2017-06-14T00:00:00Z"]]}
        },
        "links": [],
        "ml-aoi:split": "train",
        "summaries": {"ml-aoi:split": ["train"]}
    })
}

#[cfg(test)]
mod schema_rules {
    use super::*;

    #[test]
    fn test_valid_collection() {
        let validator = create_ml_aoi_validator().unwrap();
        let result = validator.validate(&collection());
        assert!(result.is_ok(), "Collection should be valid: {:?}", result);
    }

    #[test]
    fn test_summaries_must_be_lists_of_splits() {
        let validator = create_ml_aoi_validator().unwrap();

        let mut document = collection();
        document["summaries"]["ml-aoi:split"] = json!("train");
        let err = validator.validate_basic(&document).unwrap_err();
        assert_eq!(err.path, "$.summaries.ml-aoi:split");

        document["summaries"]["ml-aoi:split"] = json!(["train", "holdout"]);
        let err = validator.validate_basic(&document).unwrap_err();
        assert_eq!(err.path, "$.summaries.ml-aoi:split[1]");
    }

    #[test]
    fn test_item_assets_are_checked() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        document["item_assets"] = json!({"raster": {"ml-aoi:resampling-method": "cubcspline"}});
        let err = validator.validate_basic(&document).unwrap_err();
        assert_eq!(err.path, "$.item_assets.raster.ml-aoi:resampling-method");
        assert!(err.to_string().contains("json_schema"));
    }

    #[test]
    fn test_reference_grid_must_be_boolean() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        document["assets"] = json!({"raster": {"href": "r.tif", "ml-aoi:reference-grid": "true"}});
        assert!(validator.validate_basic(&document).is_err());

        document["assets"]["raster"]["ml-aoi:reference-grid"] = json!(false);
        assert!(validator.validate_basic(&document).is_ok());
    }

    #[test]
    fn test_unknown_prefixed_fields_are_allowed() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        document["ml-aoi:comment"] = json!("free text");
        assert!(validator.validate(&document).is_ok());
    }
}

#[cfg(test)]
mod validation_modes {
    use super::*;

    #[test]
    fn test_split_on_asset_fails_partial_only() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        document["assets"] = json!({"labels": {"href": "labels.geojson", "ml-aoi:split": "train"}});

        assert!(validator.validate_basic(&document).is_ok());
        let err = validator.validate_partial(&document).unwrap_err();
        assert_eq!(err.path, "$.assets.labels.ml-aoi:split");
        assert!(err.message.contains("not allowed on Asset"));
    }

    #[test]
    fn test_role_on_collection_fails_partial() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        document["ml-aoi:role"] = json!("label");
        let err = validator.validate_partial(&document).unwrap_err();
        assert_eq!(err.path, "$.ml-aoi:role");
    }

    #[test]
    fn test_strict_needs_at_least_one_field() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        let object = document.as_object_mut().unwrap();
        object.remove("ml-aoi:split");
        object.remove("summaries");

        assert!(validator.validate_partial(&document).is_ok());
        let err = validator.validate(&document).unwrap_err();
        assert!(err.to_string().contains("ML-AOI extension must provide at least one valid field."));
    }

    #[test]
    fn test_context_path_prefixes_errors() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        document["ml-aoi:split"] = json!("dev");

        let context = ValidationContext::new(ValidationMode::Basic).child_index(4);
        let err = validator.validate_with_context(&document, &context).unwrap_err();
        assert_eq!(err.path, "$[4].ml-aoi:split");
    }

    #[test]
    fn test_collect_errors_returns_all() {
        let validator = create_ml_aoi_validator().unwrap();
        let mut document = collection();
        document["ml-aoi:split"] = json!("dev");
        document["summaries"]["ml-aoi:split"] = json!(["dev"]);
        document["links"] = json!([{"href": "a", "rel": "item", "ml-aoi:split": "train"}]);

        let errors = validator.collect_errors(&document);
        assert_eq!(errors.len(), 3, "{}", errors);
    }
}

#[cfg(test)]
mod batch_validation {
    use super::*;

    #[test]
    fn test_batch_mixes_valid_and_invalid() {
        let mut invalid = collection();
        invalid["stac_extensions"] = json!([]);
        let documents = vec![collection(), invalid, collection()];

        let errors = validate_documents_batch(&documents, &ValidationConfig::basic()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].path, "$[1].stac_extensions");
    }

    #[test]
    fn test_batch_all_valid() {
        let documents = vec![collection(), collection()];
        assert!(validate_documents_batch(&documents, &ValidationConfig::strict()).is_ok());
    }
}
