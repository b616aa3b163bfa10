//! STAC Collection
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::stac::{default_stac_version, Asset, Link, ObjectKind, Properties, StacObject};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

fn collection_type() -> String {
    "Collection".to_string()
}

/// A STAC Collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Always `Collection`
    #[serde(rename = "type", default = "collection_type")]
    pub r#type: String,

    #[serde(default = "default_stac_version")]
    pub stac_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    pub license: String,

    /// Spatial and temporal extent, kept opaque
    pub extent: Value,

    /// Summaries of the Item properties, keyed by field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Map<String, Value>>,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Asset>,

    /// Members not modelled above, including Collection-level extension fields
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Collection {
    /// Create a Collection with the given extent
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        license: impl Into<String>,
        extent: Value,
    ) -> Self {
        Self {
            r#type: collection_type(),
            stac_version: default_stac_version(),
            stac_extensions: Vec::new(),
            id: id.into(),
            title: None,
            description: description.into(),
            keywords: None,
            license: license.into(),
            extent,
            summaries: None,
            links: Vec::new(),
            assets: BTreeMap::new(),
            additional_fields: Map::new(),
        }
    }

    /// Extent covering the whole globe and an open time interval
    pub fn global_extent() -> Value {
        json!({
            "spatial": {"bbox": [[-180.0, -90.0, 180.0, 90.0]]},
            "temporal": {"interval": [[null, null]]}
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_asset(mut self, key: impl Into<String>, asset: Asset) -> Self {
        self.assets.insert(key.into(), asset);
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }
}

impl StacObject for Collection {
    const KIND: ObjectKind = ObjectKind::Collection;

    fn id(&self) -> &str {
        &self.id
    }

    fn assets(&self) -> &BTreeMap<String, Asset> {
        &self.assets
    }

    fn assets_mut(&mut self) -> &mut BTreeMap<String, Asset> {
        &mut self.assets
    }

    fn links(&self) -> &[Link] {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Vec<Link> {
        &mut self.links
    }

    fn asset_with_owner_properties(&mut self, key: &str) -> Option<(&mut Asset, Option<&Properties>)> {
        self.assets.get_mut(key).map(|asset| (asset, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_serialization() {
        let collection = Collection::new(
            "EuroSAT-subset-train",
            "EuroSAT train split",
            "MIT",
            Collection::global_extent(),
        );
        let value = serde_json::to_value(&collection).unwrap();

        assert_eq!(value["type"], "Collection");
        assert_eq!(value["license"], "MIT");
        assert!(value.get("summaries").is_none());
        assert!(value.get("assets").is_none());
        assert!(value.get("stac_extensions").is_none());

        let parsed: Collection = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, collection);
    }

    #[test]
    fn test_top_level_fields_land_in_additional_fields() {
        let value = serde_json::json!({
            "type": "Collection",
            "id": "c",
            "description": "d",
            "license": "MIT",
            "extent": Collection::global_extent(),
            "links": [],
            "ml-aoi:split": "train"
        });
        let collection: Collection = serde_json::from_value(value).unwrap();
        assert_eq!(collection.additional_fields["ml-aoi:split"], "train");
        assert_eq!(collection.stac_version, "1.0.0");
    }
}
