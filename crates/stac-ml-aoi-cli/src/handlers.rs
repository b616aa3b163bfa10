//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand,
//! plus the document reading shared by them.

mod apply;
mod assets;
mod completions;
mod config;
mod validate;

pub use apply::handle_apply;
pub use assets::handle_assets;
pub use completions::handle_completions;
pub use config::handle_config;
pub use validate::handle_validate;

use crate::config::Config;
use crate::error::{Error, Result};
use serde_json::Value;
use stac_ml_aoi::loader::{DocumentParser, Format};
use stac_ml_aoi::{StacLoader, StacValue, ML_AOI_HOOKS};
use std::path::Path;
use tracing::{debug, info};

/// Fail early with a dedicated error for missing input files
fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Loader configured from the `[loader]` section
fn loader(config: &Config) -> StacLoader {
    StacLoader::with_config(config.loader.clone())
}

/// Read a document without blocking the runtime, migrating legacy declarations
async fn read_document(path: &Path, config: &Config) -> Result<Value> {
    ensure_exists(path)?;
    let format = Format::from_path(path)?;
    let content = tokio::fs::read_to_string(path).await?;
    debug!(path = %path.display(), bytes = content.len(), "Read document");

    let mut document = DocumentParser::new().parse_content(&content, format, path)?;
    if config.loader.migrate_extensions && ML_AOI_HOOKS.migrate(&mut document) {
        info!(path = %path.display(), "Migrated legacy ML-AOI extension declaration");
    }
    Ok(document)
}

/// Read and interpret an Item or a Collection
async fn read_stac(path: &Path, config: &Config) -> Result<StacValue> {
    let document = read_document(path, config).await?;
    Ok(loader(config).from_value(document, path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stac_ml_aoi::SCHEMA_URI;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_document_migrates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("item.json");
        std::fs::write(
            &path,
            r#"{"type": "Feature", "id": "a", "stac_extensions": ["ml-aoi"], "properties": {}, "assets": {}}"#,
        )
        .unwrap();

        let document = read_document(&path, &Config::default()).await.unwrap();
        assert_eq!(document["stac_extensions"], serde_json::json!([SCHEMA_URI]));

        let mut config = Config::default();
        config.loader.migrate_extensions = false;
        let document = read_document(&path, &config).await.unwrap();
        assert_eq!(document["stac_extensions"], serde_json::json!(["ml-aoi"]));
    }

    #[tokio::test]
    async fn test_read_missing_and_unsupported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_document(&missing, &Config::default()).await,
            Err(Error::FileNotFound { .. })
        ));

        let text = dir.path().join("item.txt");
        std::fs::write(&text, "{}").unwrap();
        assert!(matches!(read_stac(&text, &Config::default()).await, Err(Error::Loader(_))));
    }
}
