//! STAC ML-AOI - typed accessors and validation for the ML-AOI extension
//!
//! This crate implements the [ML-AOI](https://github.com/stac-extensions/ml-aoi)
//! STAC extension, which annotates Collections, Items, Assets and Links with
//! machine-learning metadata:
//! - **`ml-aoi:split`**: train / validate / test split of Items and Collections
//! - **`ml-aoi:role`**: whether an Asset or Link is a `label` or a `feature`
//! - **`ml-aoi:reference-grid`**: whether an Asset defines the reference grid
//! - **`ml-aoi:resampling-method`**: GDAL resampling method used to align an Asset
//!
//! ## Features
//!
//! - **Typed Field Records**: one record per object kind, with the
//!   "at least one field" rule enforced before anything is written
//! - **Property Accessors**: read/write fields through the STAC object's
//!   property bag by prefixed key, attribute name or bare name
//! - **Summaries**: list-valued Collection summaries of the same fields
//! - **Asset Filtering**: select Item assets by role, reference grid and resampling
//! - **Schema Validation**: JSON Schema draft-07 checks plus placement rules
//! - **Legacy Migration**: upgrade old `stac_extensions` declarations on load
//!
//! ## Quick Start
//!
//! ```rust
//! use stac_ml_aoi::{Item, ItemFields, MlAoi, MlAoiExtension, Split};
//!
//! let mut item = Item::new("EuroSAT-subset-train-sample-42");
//! let mut ext = MlAoi::item(&mut item, true).unwrap();
//! ext.apply(ItemFields { split: Some(Split::Train) }).unwrap();
//!
//! assert!(MlAoi::has_extension(&item));
//! assert_eq!(item.properties["ml-aoi:split"], "train");
//! ```
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

pub mod extension;
pub mod fields;
pub mod loader;
pub mod stac;
pub mod validation;

/// Short identifier of the extension
pub const SCHEMA_ID: &str = "ml-aoi";

/// Canonical schema URI declared in `stac_extensions`
pub const SCHEMA_URI: &str = "https://stac-extensions.github.io/ml-aoi/v0.2.0/schema.json";

/// Base of every published ML-AOI schema URI, regardless of version
pub const SCHEMA_URI_BASE: &str = "https://stac-extensions.github.io/ml-aoi/";

/// Prefix of every ML-AOI field key
pub const PREFIX: &str = "ml-aoi:";

/// Prefix of the attribute-style field aliases (`ml_aoi_split`)
pub const PROPERTY_PREFIX: &str = "ml_aoi_";

// Re-export commonly used types for convenience
pub use extension::{
    AssetExtension, AssetFilter, CollectionExtension, ExtensionError, ExtensionHooks,
    ExtensionResult, ItemExtension, LinkExtension, MlAoi, MlAoiExtension, SummariesExtension,
    ML_AOI_HOOKS,
};
pub use fields::{
    add_prefix, AssetFields, CollectionFields, FieldName, Fields, ItemFields, LinkFields,
    MlAoiFields, ResamplingMethod, Role, Split,
};
pub use loader::{LoaderConfig, LoaderError, LoaderResult, StacLoader};
pub use stac::{Asset, Collection, Extensions, Item, Link, ObjectKind, StacObject, StacValue};
pub use validation::{
    create_ml_aoi_validator, validate_documents_batch, MlAoiValidator, SchemaValidator,
    ValidationConfig, ValidationContext, ValidationError, ValidationErrors, ValidationMode,
    ValidationResult,
};
