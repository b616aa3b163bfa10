//! Asset listing command handler

use super::read_stac;
use crate::cli::AssetsArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use serde::Serialize;
use stac_ml_aoi::{AssetFilter, Item, MlAoi, ResamplingMethod, Role, StacValue};
use tracing::{debug, info, instrument};

/// ML-AOI view of one selected asset
#[derive(Debug, Serialize)]
struct AssetSummary {
    key: String,
    href: String,
    #[serde(rename = "ml-aoi:role", skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(rename = "ml-aoi:reference-grid", skip_serializing_if = "Option::is_none")]
    reference_grid: Option<bool>,
    #[serde(rename = "ml-aoi:resampling-method", skip_serializing_if = "Option::is_none")]
    resampling_method: Option<ResamplingMethod>,
}

/// Handle the assets command
#[instrument(skip(args, config, output), fields(item = %args.item.display()))]
pub async fn handle_assets(args: AssetsArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("assets_command");

    let mut item = match read_stac(&args.item, config).await? {
        StacValue::Item(item) => item,
        StacValue::Collection(collection) => {
            return Err(Error::invalid_args(format!(
                "'{}' is a Collection ({}); assets can only be filtered on an Item",
                args.item.display(),
                collection.id
            )));
        }
    };

    let filter = build_filter(&args);
    let summaries = select_assets(&mut item, &filter)?;
    info!(item = %item.id, selected = summaries.len(), total = item.assets.len(), "Selected assets");

    if !output.is_human() {
        return output.data(&summaries);
    }

    if summaries.is_empty() {
        output.warning(&format!("No asset of item '{}' matches the filter", item.id))?;
        return Ok(());
    }

    output.section(&format!("Assets of {}", item.id))?;
    let rows = summaries
        .iter()
        .map(|summary| {
            vec![
                summary.key.clone(),
                redaction::redact_href(&summary.href),
                display(summary.role),
                display(summary.reference_grid),
                display(summary.resampling_method),
            ]
        })
        .collect();
    output.table(&["KEY", "HREF", "ROLE", "REFERENCE GRID", "RESAMPLING METHOD"], rows)
}

fn build_filter(args: &AssetsArgs) -> AssetFilter {
    let mut filter = AssetFilter::new().with_roles(args.roles.iter().copied());
    if let Some(reference_grid) = args.reference_grid {
        filter = filter.with_reference_grid(reference_grid);
    }
    if let Some(method) = args.resampling_method {
        filter = filter.with_resampling_method(method);
    }
    filter
}

/// Filter the assets, then read each selection's fields with the Item as fallback
fn select_assets(item: &mut Item, filter: &AssetFilter) -> Result<Vec<AssetSummary>> {
    let keys: Vec<String> = MlAoi::item(item, false)?
        .assets(filter)
        .into_keys()
        .map(str::to_string)
        .collect();
    debug!(?filter, keys = ?keys, "Filtered assets");

    keys.into_iter()
        .map(|key| -> Result<AssetSummary> {
            let ext = MlAoi::asset(item, &key, false)?;
            Ok(AssetSummary {
                href: ext.asset().href.clone(),
                role: ext.role()?,
                reference_grid: ext.reference_grid()?,
                resampling_method: ext.resampling_method()?,
                key,
            })
        })
        .collect()
}

fn display<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
