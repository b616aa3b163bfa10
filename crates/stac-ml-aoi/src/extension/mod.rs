//! ML-AOI extension accessors for STAC objects
//!
//! This module mediates between the generic property bag of a STAC object
//! and the typed ML-AOI field records. Accessors are obtained through
//! [`MlAoi`], which also manages the `stac_extensions` declaration:
//!
//! - [`ItemExtension`]: `ml-aoi:split` in the Item properties, asset filtering
//! - [`CollectionExtension`]: `ml-aoi:split` at the Collection top level
//! - [`SummariesExtension`]: list-valued Collection summaries
//! - [`AssetExtension`]: role, reference grid and resampling method of an Asset
//! - [`LinkExtension`]: role of a Link
//!
//! # Example Usage
//!
//! ```rust
//! use stac_ml_aoi::{Asset, Item, MlAoi, MlAoiExtension, Role};
//!
//! let mut item = Item::new("sample").with_asset("labels", Asset::new("labels.geojson"));
//! let mut labels = MlAoi::asset(&mut item, "labels", true)?;
//! labels.set_role(Some(Role::Label))?;
//! assert_eq!(labels.get_property("role")?.unwrap(), "label");
//! # Ok::<(), stac_ml_aoi::ExtensionError>(())
//! ```
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

pub mod asset;
pub mod collection;
pub mod error;
pub mod hooks;
pub mod item;
pub mod link;
pub mod summaries;

pub use asset::AssetExtension;
pub use collection::CollectionExtension;
pub use error::{ExtensionError, ExtensionResult};
pub use hooks::{ExtensionHooks, ML_AOI_HOOKS};
pub use item::{AssetFilter, ItemExtension};
pub use link::LinkExtension;
pub use summaries::SummariesExtension;

use crate::fields::{self, FieldName, Fields, MlAoiFields};
use crate::stac::{Collection, Extensions, Item, ObjectKind, StacObject};
use crate::{SCHEMA_ID, SCHEMA_URI};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

/// Entry points of the ML-AOI extension
pub struct MlAoi;

impl MlAoi {
    /// Schema URI declared by objects implementing the extension
    pub fn schema_uri() -> &'static str {
        SCHEMA_URI
    }

    /// Check whether the object declares the extension
    pub fn has_extension<O: Extensions + ?Sized>(object: &O) -> bool {
        object.has_extension(SCHEMA_URI)
    }

    /// Make sure the object declares the extension
    ///
    /// The schema URI is added when `add_if_missing` is set, otherwise a
    /// missing declaration is an error.
    pub fn ensure_has_extension<O: StacObject>(object: &mut O, add_if_missing: bool) -> ExtensionResult<()> {
        if add_if_missing {
            object.add_extension(SCHEMA_URI);
        }

        if Self::has_extension(object) {
            Ok(())
        } else {
            Err(ExtensionError::NotImplemented {
                object: O::KIND,
                id: object.id().to_string(),
                uri: SCHEMA_URI,
            })
        }
    }

    /// Extend an Item
    pub fn item(item: &mut Item, add_if_missing: bool) -> ExtensionResult<ItemExtension<'_>> {
        Self::ensure_has_extension(item, add_if_missing)?;
        Ok(ItemExtension::new(item))
    }

    /// Extend the top-level fields of a Collection
    pub fn collection(
        collection: &mut Collection,
        add_if_missing: bool,
    ) -> ExtensionResult<CollectionExtension<'_>> {
        Self::ensure_has_extension(collection, add_if_missing)?;
        Ok(CollectionExtension::new(collection))
    }

    /// Extend the summaries of a Collection
    pub fn summaries(
        collection: &mut Collection,
        add_if_missing: bool,
    ) -> ExtensionResult<SummariesExtension<'_>> {
        Self::ensure_has_extension(collection, add_if_missing)?;
        Ok(SummariesExtension::new(collection))
    }

    /// Extend an asset of an Item or Collection
    ///
    /// The declaration is checked (or added) on the owning object.
    pub fn asset<'a, O: StacObject>(
        owner: &'a mut O,
        key: &str,
        add_if_missing: bool,
    ) -> ExtensionResult<AssetExtension<'a>> {
        Self::ensure_has_extension(owner, add_if_missing)?;
        let id = owner.id().to_string();
        let (asset, owner_properties) =
            owner
                .asset_with_owner_properties(key)
                .ok_or_else(|| ExtensionError::AssetNotFound {
                    key: key.to_string(),
                    object: O::KIND,
                    id,
                })?;
        Ok(AssetExtension::with_owner_properties(key, asset, owner_properties))
    }

    /// Extend a link of an Item or Collection
    pub fn link<'a, O: StacObject>(
        owner: &'a mut O,
        index: usize,
        add_if_missing: bool,
    ) -> ExtensionResult<LinkExtension<'a>> {
        Self::ensure_has_extension(owner, add_if_missing)?;
        let id = owner.id().to_string();
        let links = owner.links_mut();
        let len = links.len();
        let link = links.get_mut(index).ok_or(ExtensionError::LinkNotFound {
            index,
            len,
            object: O::KIND,
            id,
        })?;
        Ok(LinkExtension::new(link))
    }
}

/// Field access shared by the Item, Collection, Asset and Link extensions
pub trait MlAoiExtension {
    /// Field record of the extended object kind
    type Fields: MlAoiFields;

    /// Host property bag holding the extension fields
    fn properties(&self) -> &Map<String, Value>;

    fn properties_mut(&mut self) -> &mut Map<String, Value>;

    /// Extension identifier
    fn name(&self) -> &'static str {
        SCHEMA_ID
    }

    fn kind(&self) -> ObjectKind {
        <Self::Fields as MlAoiFields>::KIND
    }

    /// Whether the name addresses this extension
    fn is_ml_aoi_property(&self, name: &str) -> bool {
        fields::is_ml_aoi_property(name, self.kind())
    }

    /// Read a field; the name must resolve to a field of this object kind
    fn get_property(&self, name: &str) -> ExtensionResult<Option<&Value>> {
        let field = required_field(name, self.kind())?;
        Ok(self.properties().get(field.key()))
    }

    /// Validate and write a field; `null` removes it
    fn set_property<V: Into<Value>>(&mut self, name: &str, value: V) -> ExtensionResult<()> {
        let field = required_field(name, self.kind())?;
        write_field(self.properties_mut(), field, value.into())
    }

    /// Read any property, resolving ML-AOI names and passing others through
    fn get(&self, name: &str) -> ExtensionResult<Option<&Value>> {
        Ok(match fields::resolve(name, self.kind(), false)? {
            Some(field) => self.properties().get(field.key()),
            None => self.properties().get(name),
        })
    }

    /// Write any property, validating ML-AOI names and passing others through
    fn set<V: Into<Value>>(&mut self, name: &str, value: V) -> ExtensionResult<()> {
        let value = value.into();
        match fields::resolve(name, self.kind(), false)? {
            Some(field) => write_field(self.properties_mut(), field, value),
            None => {
                write_raw(self.properties_mut(), name, value);
                Ok(())
            }
        }
    }

    /// Apply a field record: set fields are stored, unset fields are removed
    fn apply(&mut self, fields: Self::Fields) -> ExtensionResult<()> {
        let properties = fields.to_properties()?;
        let kind = self.kind();
        write_record(self.properties_mut(), kind, properties);
        Ok(())
    }

    /// Apply a record whose kind is only known at run time
    fn apply_fields(&mut self, fields: Fields) -> ExtensionResult<()> {
        if fields.kind() != self.kind() {
            return Err(ExtensionError::TypeMismatch {
                fields: fields.name(),
                object: self.kind(),
            });
        }
        let properties = fields.to_properties()?;
        let kind = self.kind();
        write_record(self.properties_mut(), kind, properties);
        Ok(())
    }

    /// Parse a record from plain JSON and apply it
    fn apply_value(&mut self, value: Value) -> ExtensionResult<()> {
        let fields = Self::Fields::from_value(value)?;
        self.apply(fields)
    }

    /// Read the typed record back from the property bag
    fn fields(&self) -> ExtensionResult<Self::Fields> {
        Self::Fields::from_properties(self.properties())
    }
}

fn required_field(name: &str, kind: ObjectKind) -> ExtensionResult<FieldName> {
    fields::resolve(name, kind, true)?.ok_or_else(|| ExtensionError::InvalidField {
        name: name.to_string(),
        kind,
    })
}

pub(crate) fn write_field(properties: &mut Map<String, Value>, field: FieldName, value: Value) -> ExtensionResult<()> {
    if value.is_null() {
        if properties.remove(field.key()).is_some() {
            debug!(field = field.key(), "Removed ML-AOI field");
        }
        return Ok(());
    }

    field.check_value(&value)?;
    debug!(field = field.key(), value = %value, "Set ML-AOI field");
    properties.insert(field.key().to_string(), value);
    Ok(())
}

fn write_raw(properties: &mut Map<String, Value>, name: &str, value: Value) {
    if value.is_null() {
        properties.remove(name);
    } else {
        properties.insert(name.to_string(), value);
    }
}

fn write_record(target: &mut Map<String, Value>, kind: ObjectKind, mut record: Map<String, Value>) {
    for field in FieldName::for_kind(kind) {
        match record.remove(field.key()) {
            Some(value) => {
                target.insert(field.key().to_string(), value);
            }
            None => {
                target.remove(field.key());
            }
        }
    }
    debug!(kind = %kind, "Applied ML-AOI fields");
}

/// Deserialize an optional field value into its typed form
pub(crate) fn typed<T: DeserializeOwned>(value: Option<&Value>) -> ExtensionResult<Option<T>> {
    value
        .map(|value| serde_json::from_value(value.clone()))
        .transpose()
        .map_err(ExtensionError::from)
}

/// Serialize an optional typed value, `None` becoming `null`
pub(crate) fn untyped<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{ItemFields, Split};
    use crate::stac::{Asset, Link};
    use serde_json::json;

    #[test]
    fn test_ensure_has_extension() {
        let mut item = Item::new("item-1");
        let err = MlAoi::item(&mut item, false).unwrap_err();
        assert!(matches!(err, ExtensionError::NotImplemented { object: ObjectKind::Item, .. }));
        assert!(!MlAoi::has_extension(&item));

        MlAoi::item(&mut item, true).unwrap();
        assert_eq!(item.stac_extensions, vec![SCHEMA_URI.to_string()]);

        // declaring twice keeps a single entry
        MlAoi::item(&mut item, true).unwrap();
        assert_eq!(item.stac_extensions.len(), 1);
    }

    #[test]
    fn test_asset_and_link_lookup_errors() {
        let mut item = Item::new("item-1")
            .with_asset("image", Asset::new("image.tif"))
            .with_link(Link::new("../collection.json", "collection"));

        let err = MlAoi::asset(&mut item, "labels", true).unwrap_err();
        assert_eq!(err.to_string(), "Asset 'labels' not found on Item 'item-1'");

        let err = MlAoi::link(&mut item, 3, true).unwrap_err();
        assert!(matches!(err, ExtensionError::LinkNotFound { index: 3, len: 1, .. }));

        assert!(MlAoi::link(&mut item, 0, true).is_ok());
    }

    #[test]
    fn test_lenient_access_passes_host_properties_through() {
        let mut item = Item::new("item-1");
        let mut ext = MlAoi::item(&mut item, true).unwrap();

        ext.set("platform", "sentinel-2a").unwrap();
        assert_eq!(ext.get("platform").unwrap().unwrap(), "sentinel-2a");
        assert!(ext.get_property("platform").is_err());

        ext.set("ml_aoi_split", "validate").unwrap();
        assert_eq!(ext.get("ml-aoi:split").unwrap().unwrap(), "validate");
        assert!(ext.set("split", "training").is_err());

        ext.set("platform", Value::Null).unwrap();
        assert!(ext.get("platform").unwrap().is_none());
    }

    #[test]
    fn test_apply_fields_kind_mismatch() {
        let mut item = Item::new("item-1");
        let mut ext = MlAoi::item(&mut item, true).unwrap();

        let err = ext
            .apply_fields(Fields::Asset(crate::fields::AssetFields {
                role: Some(crate::fields::Role::Label),
                ..Default::default()
            }))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot use AssetFields with STAC Object Item");

        ext.apply_fields(ItemFields { split: Some(Split::Test) }.into()).unwrap();
        assert_eq!(item.properties["ml-aoi:split"], json!("test"));
    }
}
