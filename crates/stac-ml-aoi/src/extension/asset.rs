//! ML-AOI fields of a STAC Asset
//!
//! Reads fall back to the properties of the owning Item, so an asset
//! inherits fields declared once for the whole Item. Writes always target
//! the asset itself.
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use super::{typed, untyped, ExtensionResult, MlAoiExtension};
use crate::fields::{self, AssetFields, FieldName, MlAoiFields, ResamplingMethod, Role};
use crate::stac::{Asset, Properties};
use serde_json::{Map, Value};
use std::fmt;

/// Extension accessor over an Asset
pub struct AssetExtension<'a> {
    key: String,
    asset: &'a mut Asset,
    owner_properties: Option<&'a Properties>,
}

impl<'a> AssetExtension<'a> {
    /// Extend a standalone asset
    pub fn new(key: impl Into<String>, asset: &'a mut Asset) -> Self {
        Self::with_owner_properties(key, asset, None)
    }

    pub(crate) fn with_owner_properties(
        key: impl Into<String>,
        asset: &'a mut Asset,
        owner_properties: Option<&'a Properties>,
    ) -> Self {
        Self {
            key: key.into(),
            asset,
            owner_properties,
        }
    }

    /// Key of the asset in its owner's asset map
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn asset(&self) -> &Asset {
        self.asset
    }

    fn lookup(&self, field: FieldName) -> Option<&Value> {
        self.asset
            .additional_fields
            .get(field.key())
            .or_else(|| self.owner_properties.and_then(|properties| properties.get(field.key())))
    }

    pub fn role(&self) -> ExtensionResult<Option<Role>> {
        typed(self.lookup(FieldName::Role))
    }

    pub fn set_role(&mut self, role: Option<Role>) -> ExtensionResult<()> {
        self.set_property(FieldName::Role.key(), untyped(role))
    }

    pub fn reference_grid(&self) -> ExtensionResult<Option<bool>> {
        typed(self.lookup(FieldName::ReferenceGrid))
    }

    pub fn set_reference_grid(&mut self, reference_grid: Option<bool>) -> ExtensionResult<()> {
        self.set_property(FieldName::ReferenceGrid.key(), untyped(reference_grid))
    }

    pub fn resampling_method(&self) -> ExtensionResult<Option<ResamplingMethod>> {
        typed(self.lookup(FieldName::ResamplingMethod))
    }

    pub fn set_resampling_method(&mut self, method: Option<ResamplingMethod>) -> ExtensionResult<()> {
        self.set_property(FieldName::ResamplingMethod.key(), untyped(method))
    }
}

impl MlAoiExtension for AssetExtension<'_> {
    type Fields = AssetFields;

    fn properties(&self) -> &Map<String, Value> {
        &self.asset.additional_fields
    }

    fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.asset.additional_fields
    }

    fn get_property(&self, name: &str) -> ExtensionResult<Option<&Value>> {
        let field = fields::resolve(name, self.kind(), true)?;
        Ok(field.and_then(|field| self.lookup(field)))
    }

    fn get(&self, name: &str) -> ExtensionResult<Option<&Value>> {
        Ok(match fields::resolve(name, self.kind(), false)? {
            Some(field) => self.lookup(field),
            None => self.asset.additional_fields.get(name),
        })
    }

    /// The record merges asset fields over inherited owner fields
    fn fields(&self) -> ExtensionResult<AssetFields> {
        let mut merged = Map::new();
        for field in FieldName::for_kind(self.kind()) {
            if let Some(value) = self.lookup(field) {
                merged.insert(field.key().to_string(), value.clone());
            }
        }
        AssetFields::from_properties(&merged)
    }
}

impl fmt::Debug for AssetExtension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetExtension")
            .field("key", &self.key)
            .field("href", &self.asset.href)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{ExtensionError, MlAoi};
    use crate::stac::{Collection, Item};
    use serde_json::json;

    #[test]
    fn test_typed_accessors() {
        let mut asset = Asset::new("image.tif");
        let mut ext = AssetExtension::new("image", &mut asset);

        ext.set_role(Some(Role::Feature)).unwrap();
        ext.set_reference_grid(Some(true)).unwrap();
        ext.set_resampling_method(Some(ResamplingMethod::CubicSpline)).unwrap();

        assert_eq!(ext.role().unwrap(), Some(Role::Feature));
        assert_eq!(ext.reference_grid().unwrap(), Some(true));
        assert_eq!(ext.resampling_method().unwrap(), Some(ResamplingMethod::CubicSpline));
        assert_eq!(asset.additional_fields["ml-aoi:resampling-method"], json!("cubicspline"));
    }

    #[test]
    fn test_reads_fall_back_to_item_properties() {
        let mut item = Item::new("item-1")
            .with_property("ml-aoi:resampling-method", "near")
            .with_asset("image", Asset::new("image.tif").with_field("ml-aoi:role", "feature"));

        let mut ext = MlAoi::asset(&mut item, "image", true).unwrap();
        assert_eq!(ext.resampling_method().unwrap(), Some(ResamplingMethod::Near));
        assert_eq!(ext.get_property("resampling_method").unwrap().unwrap(), "near");
        assert_eq!(
            ext.fields().unwrap(),
            AssetFields {
                role: Some(Role::Feature),
                reference_grid: None,
                resampling_method: Some(ResamplingMethod::Near),
            }
        );

        // asset values shadow the inherited ones; writes stay on the asset
        ext.set_resampling_method(Some(ResamplingMethod::Mode)).unwrap();
        assert_eq!(ext.resampling_method().unwrap(), Some(ResamplingMethod::Mode));
        assert_eq!(item.properties["ml-aoi:resampling-method"], json!("near"));
        assert_eq!(
            item.assets["image"].additional_fields["ml-aoi:resampling-method"],
            json!("mode")
        );
    }

    #[test]
    fn test_collection_assets_have_no_fallback() {
        let mut collection = Collection::new(
            "collection-1",
            "A collection",
            "MIT",
            Collection::global_extent(),
        )
        .with_asset("labels", Asset::new("labels.geojson"));
        collection
            .additional_fields
            .insert("ml-aoi:split".to_string(), json!("train"));

        let ext = MlAoi::asset(&mut collection, "labels", true).unwrap();
        assert_eq!(ext.role().unwrap(), None);
        assert!(MlAoi::has_extension(&collection));
    }

    #[test]
    fn test_split_is_not_an_asset_field() {
        let mut asset = Asset::new("image.tif");
        let mut ext = AssetExtension::new("image", &mut asset);
        let err = ext.set_property("split", "train").unwrap_err();
        assert!(matches!(err, ExtensionError::InvalidField { .. }));
        assert!(ext.set("ml-aoi:reference-grid", "yes").is_err());
        assert!(ext.set("reference-grid", false).is_ok());
    }

    #[test]
    fn test_role_lists_are_rejected() {
        let mut asset = Asset::new("labels.geojson").with_field("ml-aoi:role", json!(["label", "feature"]));
        let ext = AssetExtension::new("labels", &mut asset);
        assert!(ext.role().is_err());
        assert!(ext.fields().is_err());
    }

    #[test]
    fn test_debug_rendering() {
        let mut asset = Asset::new("labels.geojson");
        let ext = AssetExtension::new("labels", &mut asset);
        assert_eq!(
            format!("{:?}", ext),
            r#"AssetExtension { key: "labels", href: "labels.geojson" }"#
        );
    }
}
