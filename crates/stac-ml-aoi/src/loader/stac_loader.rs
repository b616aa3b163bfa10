//! Loading and saving of STAC Items and Collections
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::extension::ML_AOI_HOOKS;
use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::parser::{DocumentParser, Format};
use crate::stac::{Collection, Item, ObjectKind, StacError, StacValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration for loader behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Rewrite legacy ML-AOI declarations to the current schema URI
    pub migrate_extensions: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            migrate_extensions: true,
        }
    }
}

/// Reads STAC documents from disk into typed objects
#[derive(Debug, Default)]
pub struct StacLoader {
    config: LoaderConfig,
    parser: DocumentParser,
}

impl StacLoader {
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config,
            parser: DocumentParser::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Parse a document into raw JSON, migrating legacy declarations
    pub fn load_value(&self, path: &Path) -> LoaderResult<Value> {
        let mut document = self.parser.parse_file(path)?;
        if self.config.migrate_extensions && ML_AOI_HOOKS.migrate(&mut document) {
            info!(path = %path.display(), "Migrated legacy ML-AOI extension declaration");
        }
        Ok(document)
    }

    /// Load an Item or a Collection, dispatching on the `type` member
    pub fn load(&self, path: &Path) -> LoaderResult<StacValue> {
        let document = self.load_value(path)?;
        let value = self.from_value(document, path)?;
        debug!(path = %path.display(), kind = %value.kind(), id = value.id(), "Loaded STAC document");
        Ok(value)
    }

    pub fn load_item(&self, path: &Path) -> LoaderResult<Item> {
        match self.load(path)? {
            StacValue::Item(item) => Ok(item),
            other => Err(unexpected(path, ObjectKind::Item, other.kind())),
        }
    }

    pub fn load_collection(&self, path: &Path) -> LoaderResult<Collection> {
        match self.load(path)? {
            StacValue::Collection(collection) => Ok(collection),
            other => Err(unexpected(path, ObjectKind::Collection, other.kind())),
        }
    }

    /// Interpret an already parsed document; `path` is only used in errors
    pub fn from_value(&self, document: Value, path: &Path) -> LoaderResult<StacValue> {
        StacValue::from_value(document).map_err(|e| match e {
            StacError::UnknownType { found } => LoaderError::UnknownObjectType {
                path: path.to_path_buf(),
                found,
            },
            other @ StacError::Invalid { .. } => LoaderError::deserialize_error(path.to_path_buf(), other.to_string()),
        })
    }

    /// Write a document in the format implied by the file extension
    pub fn save(&self, value: &StacValue, path: &Path) -> LoaderResult<()> {
        let format = Format::from_path(path)?;
        let document = value
            .to_value()
            .map_err(|e| LoaderError::serialize_error(path.to_path_buf(), e.to_string()))?;
        let content = self.parser.serialize(&document, format, path)?;
        std::fs::write(path, content).map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;
        debug!(path = %path.display(), id = value.id(), "Saved STAC document");
        Ok(())
    }

    /// Load several documents, keeping the outcome of each
    pub fn load_batch(&self, paths: &[PathBuf]) -> Vec<(PathBuf, LoaderResult<StacValue>)> {
        paths.iter().map(|path| (path.clone(), self.load(path))).collect()
    }
}

fn unexpected(path: &Path, expected: ObjectKind, found: ObjectKind) -> LoaderError {
    LoaderError::UnexpectedObjectType {
        path: path.to_path_buf(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stac::Extensions;
    use crate::SCHEMA_URI;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    const LEGACY_ITEM: &str = r#"{
        "type": "Feature",
        "stac_version": "1.0.0",
        "stac_extensions": ["ml-aoi"],
        "id": "item-1",
        "geometry": null,
        "properties": {"datetime": null, "ml-aoi:split": "train"},
        "links": [],
        "assets": {}
    }"#;

    #[test]
    fn test_load_migrates_legacy_declaration() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "item.geojson", LEGACY_ITEM);

        let item = StacLoader::new().load_item(&path).unwrap();
        assert!(item.has_extension(SCHEMA_URI));

        let raw = StacLoader::with_config(LoaderConfig {
            migrate_extensions: false,
        })
        .load_item(&path)
        .unwrap();
        assert_eq!(raw.stac_extensions, vec!["ml-aoi".to_string()]);
    }

    #[test]
    fn test_unexpected_object_type() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "item.json", LEGACY_ITEM);
        let err = StacLoader::new().load_collection(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Expected a STAC Collection in '{}', found a Item", path.display())
        );
    }

    #[test]
    fn test_unknown_object_type() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "catalog.json", r#"{"type": "Catalog", "id": "c"}"#);
        let err = StacLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownObjectType { found: Some(ref t), .. } if t == "Catalog"));
    }

    #[test]
    fn test_invalid_layout() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "item.json", r#"{"type": "Feature", "properties": {}}"#);
        let err = StacLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, LoaderError::DeserializeError { .. }));
    }

    #[test]
    fn test_save_as_yaml_and_reload() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "item.json", LEGACY_ITEM);
        let loader = StacLoader::new();
        let value = loader.load(&source).unwrap();

        let target = dir.path().join("item.yaml");
        loader.save(&value, &target).unwrap();
        let reloaded = loader.load(&target).unwrap();
        assert_eq!(reloaded, value);
        assert_eq!(
            reloaded.to_value().unwrap()["properties"]["ml-aoi:split"],
            json!("train")
        );
    }

    #[test]
    fn test_load_batch_keeps_each_outcome() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "item.json", LEGACY_ITEM);
        let missing = dir.path().join("missing.json");

        let results = StacLoader::new().load_batch(&[good, missing]);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(LoaderError::IoError { .. })));
    }
}
