//! STAC Item
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::stac::{default_stac_version, Asset, Link, ObjectKind, Properties, StacObject};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn feature_type() -> String {
    "Feature".to_string()
}

/// A STAC Item (GeoJSON Feature)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Always `Feature`
    #[serde(rename = "type", default = "feature_type")]
    pub r#type: String,

    #[serde(default = "default_stac_version")]
    pub stac_version: String,

    /// Schema URIs of the extensions implemented by this Item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    pub id: String,

    /// GeoJSON geometry, kept opaque
    #[serde(default)]
    pub geometry: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    /// Item properties, where Item-level extension fields live
    #[serde(default)]
    pub properties: Properties,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Members not modelled above
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Item {
    /// Create an empty Item with a null geometry and datetime
    pub fn new(id: impl Into<String>) -> Self {
        let mut properties = Properties::new();
        properties.insert("datetime".to_string(), Value::Null);
        Self {
            r#type: feature_type(),
            stac_version: default_stac_version(),
            stac_extensions: Vec::new(),
            id: id.into(),
            geometry: None,
            bbox: None,
            properties,
            links: Vec::new(),
            assets: BTreeMap::new(),
            collection: None,
            additional_fields: Map::new(),
        }
    }

    pub fn with_geometry(mut self, geometry: Value, bbox: Option<Vec<f64>>) -> Self {
        self.geometry = Some(geometry);
        self.bbox = bbox;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
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

impl StacObject for Item {
    const KIND: ObjectKind = ObjectKind::Item;

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
        let asset = self.assets.get_mut(key)?;
        Some((asset, Some(&self.properties)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_round_trip_keeps_unknown_members() {
        let document = json!({
            "type": "Feature",
            "stac_version": "1.0.0",
            "id": "sample-42",
            "geometry": null,
            "properties": {"datetime": null, "start_datetime": "2015-06-27T10:25:31.456Z"},
            "links": [],
            "assets": {},
            "custom": {"nested": true}
        });

        let item: Item = serde_json::from_value(document.clone()).unwrap();
        assert_eq!(item.additional_fields["custom"], json!({"nested": true}));
        assert_eq!(serde_json::to_value(&item).unwrap(), document);
    }

    #[test]
    fn test_declared_extensions_round_trip() {
        let document = json!({
            "type": "Feature",
            "stac_version": "1.0.0",
            "stac_extensions": ["https://stac-extensions.github.io/ml-aoi/v0.2.0/schema.json"],
            "id": "sample-7",
            "geometry": null,
            "properties": {"datetime": null},
            "links": [],
            "assets": {}
        });
        let item: Item = serde_json::from_value(document.clone()).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), document);

        let plain = serde_json::to_value(Item::new("a")).unwrap();
        assert!(plain.get("stac_extensions").is_none());
    }

    #[test]
    fn test_new_item_serializes_null_geometry() {
        let value = serde_json::to_value(Item::new("a")).unwrap();
        assert_eq!(value["type"], "Feature");
        assert!(value["geometry"].is_null());
        assert!(value.get("bbox").is_none());
        assert!(value["properties"]["datetime"].is_null());
    }
}
