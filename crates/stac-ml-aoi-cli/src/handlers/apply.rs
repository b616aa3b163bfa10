//! Apply command handler
//!
//! Sets ML-AOI fields on an Item or Collection and writes the result to
//! stdout, to another file or back in place.

use super::{loader, read_stac};
use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use stac_ml_aoi::{MlAoi, StacValue};
use tracing::{debug, info, instrument};

/// Handle the apply command
#[instrument(skip(args, config, output), fields(file = %args.file.display()))]
pub async fn handle_apply(args: ApplyArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("apply_command");
    check_args(&args)?;

    let mut value = read_stac(&args.file, config).await?;
    let changes = apply_fields(&mut value, &args)?;
    info!(id = value.id(), kind = %value.kind(), changes, "Applied ML-AOI fields");

    let destination = if args.in_place {
        Some(args.file.clone())
    } else {
        args.save_to.clone()
    };

    match destination {
        Some(path) => {
            loader(config).save(&value, &path)?;
            output.success(&format!(
                "✓ Applied {} ML-AOI field(s) to {} '{}', saved to {}",
                changes,
                value.kind(),
                value.id(),
                path.display()
            ))
        }
        None => output.data(&value.to_value()?),
    }
}

/// Reject flag combinations that would apply nothing or be ambiguous
fn check_args(args: &ApplyArgs) -> Result<()> {
    if args.split.is_none() && args.asset.is_none() && args.link.is_none() {
        return Err(Error::invalid_args(
            "nothing to apply, give --split, --asset or --link",
        ));
    }

    if args.role.is_some() && args.asset.is_none() && args.link.is_none() {
        return Err(Error::invalid_args("--role needs --asset or --link"));
    }

    if let Some(key) = &args.asset {
        if args.role.is_none() && args.reference_grid.is_none() && args.resampling_method.is_none() {
            return Err(Error::invalid_args(format!(
                "--asset {} needs --role, --reference-grid or --resampling-method",
                key
            )));
        }
    }

    if let Some(index) = args.link {
        if args.role.is_none() {
            return Err(Error::invalid_args(format!("--link {} needs --role", index)));
        }
    }

    Ok(())
}

/// Write the requested fields, returning how many were set
fn apply_fields(value: &mut StacValue, args: &ApplyArgs) -> Result<usize> {
    if args.summaries && matches!(value, StacValue::Item(_)) {
        return Err(Error::invalid_args("--summaries only applies to Collections"));
    }

    let mut changes = 0;

    if let Some(split) = args.split {
        match value {
            StacValue::Item(item) => MlAoi::item(item, true)?.set_split(Some(split))?,
            StacValue::Collection(collection) => {
                MlAoi::collection(collection, true)?.set_split(Some(split))?;
                if args.summaries {
                    MlAoi::summaries(collection, true)?.set_split(Some(vec![split]))?;
                    changes += 1;
                }
            }
        }
        changes += 1;
    }

    if let Some(key) = &args.asset {
        let mut ext = match value {
            StacValue::Item(item) => MlAoi::asset(item, key, true)?,
            StacValue::Collection(collection) => MlAoi::asset(collection, key, true)?,
        };
        if let Some(role) = args.role {
            ext.set_role(Some(role))?;
            changes += 1;
        }
        if let Some(reference_grid) = args.reference_grid {
            ext.set_reference_grid(Some(reference_grid))?;
            changes += 1;
        }
        if let Some(method) = args.resampling_method {
            ext.set_resampling_method(Some(method))?;
            changes += 1;
        }
        debug!(asset = %key, "Updated asset fields");
    }

    if let (Some(index), Some(role)) = (args.link, args.role) {
        let mut ext = match value {
            StacValue::Item(item) => MlAoi::link(item, index, true)?,
            StacValue::Collection(collection) => MlAoi::link(collection, index, true)?,
        };
        ext.set_role(Some(role))?;
        changes += 1;
        debug!(link = index, %role, "Updated link role");
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::json;
    use stac_ml_aoi::{ExtensionError, ResamplingMethod, Role, Split, SCHEMA_URI};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn args(file: &Path) -> ApplyArgs {
        ApplyArgs {
            file: file.to_path_buf(),
            split: None,
            summaries: false,
            asset: None,
            link: None,
            role: None,
            reference_grid: None,
            resampling_method: None,
            save_to: None,
            in_place: false,
        }
    }

    fn write(dir: &TempDir, name: &str, document: serde_json::Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
        path
    }

    fn plain_item() -> serde_json::Value {
        json!({
            "type": "Feature",
            "stac_version": "1.0.0",
            "id": "sample",
            "geometry": null,
            "properties": {"datetime": null},
            "links": [{"href": "./label.json", "rel": "derived_from"}],
            "assets": {"raster": {"href": "raster.tif"}}
        })
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, true, Box::new(std::io::sink()))
    }

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_apply_in_place() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "item.json", plain_item());

        let mut apply = args(&path);
        apply.split = Some(Split::Train);
        apply.asset = Some("raster".to_string());
        apply.role = Some(Role::Feature);
        apply.reference_grid = Some(true);
        apply.resampling_method = Some(ResamplingMethod::CubicSpline);
        apply.link = Some(0);
        apply.in_place = true;
        handle_apply(apply, &Config::default(), &mut quiet_output()).await.unwrap();

        let document = read(&path);
        assert_eq!(document["stac_extensions"], json!([SCHEMA_URI]));
        assert_eq!(document["properties"]["ml-aoi:split"], "train");
        assert_eq!(document["assets"]["raster"]["ml-aoi:role"], "feature");
        assert_eq!(document["assets"]["raster"]["ml-aoi:reference-grid"], true);
        assert_eq!(document["assets"]["raster"]["ml-aoi:resampling-method"], "cubicspline");
        assert_eq!(document["links"][0]["ml-aoi:role"], "feature");
    }

    #[tokio::test]
    async fn test_apply_collection_summaries_to_new_file() {
        let dir = TempDir::new().unwrap();
        let source = write(
            &dir,
            "collection.json",
            json!({
                "type": "Collection",
                "stac_version": "1.0.0",
                "id": "EuroSAT-subset-test",
                "description": "test split",
                "license": "MIT",
                "extent": {},
                "links": []
            }),
        );
        let target = dir.path().join("out").with_extension("yaml");

        let mut apply = args(&source);
        apply.split = Some(Split::Test);
        apply.summaries = true;
        apply.save_to = Some(target.clone());
        handle_apply(apply, &Config::default(), &mut quiet_output()).await.unwrap();

        let document: serde_json::Value = serde_yaml::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(document["ml-aoi:split"], "test");
        assert_eq!(document["summaries"]["ml-aoi:split"], json!(["test"]));
        assert!(read(&source).get("ml-aoi:split").is_none());
    }

    #[test]
    fn test_check_args() {
        let path = PathBuf::from("item.json");
        assert!(matches!(check_args(&args(&path)), Err(Error::InvalidArgs(_))));

        let mut role_only = args(&path);
        role_only.role = Some(Role::Label);
        assert!(matches!(check_args(&role_only), Err(Error::InvalidArgs(_))));

        let mut bare_asset = args(&path);
        bare_asset.asset = Some("raster".to_string());
        assert!(matches!(check_args(&bare_asset), Err(Error::InvalidArgs(_))));

        let mut bare_link = args(&path);
        bare_link.link = Some(0);
        assert!(matches!(check_args(&bare_link), Err(Error::InvalidArgs(_))));

        let mut split = args(&path);
        split.split = Some(Split::Validate);
        assert!(check_args(&split).is_ok());
    }

    #[test]
    fn test_summaries_on_item_leaves_document_untouched() {
        let mut value = StacValue::from_value(plain_item()).unwrap();
        let before = value.clone();
        let mut apply = args(Path::new("item.json"));
        apply.split = Some(Split::Train);
        apply.summaries = true;

        assert!(matches!(apply_fields(&mut value, &apply), Err(Error::InvalidArgs(_))));
        assert_eq!(value, before);
    }

    #[test]
    fn test_missing_targets() {
        let mut value = StacValue::from_value(plain_item()).unwrap();

        let mut apply = args(Path::new("item.json"));
        apply.asset = Some("labels".to_string());
        apply.role = Some(Role::Label);
        assert!(matches!(
            apply_fields(&mut value, &apply),
            Err(Error::Extension(ExtensionError::AssetNotFound { .. }))
        ));

        let mut apply = args(Path::new("item.json"));
        apply.link = Some(3);
        apply.role = Some(Role::Label);
        assert!(matches!(
            apply_fields(&mut value, &apply),
            Err(Error::Extension(ExtensionError::LinkNotFound { index: 3, len: 1, .. }))
        ));
    }
}
