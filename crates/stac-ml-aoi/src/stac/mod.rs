//! Minimal STAC object model carrying extension data
//!
//! Only the members needed to host the ML-AOI fields are typed. Geometry,
//! extents and anything unknown are kept as opaque JSON so that documents
//! survive a read/write round trip unchanged.
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

pub mod asset;
pub mod collection;
pub mod item;
pub mod link;

pub use asset::Asset;
pub use collection::Collection;
pub use item::Item;
pub use link::Link;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Free-form property bag of a STAC object
pub type Properties = Map<String, Value>;

/// STAC version written on newly created objects
pub const STAC_VERSION: &str = "1.0.0";

pub(crate) fn default_stac_version() -> String {
    STAC_VERSION.to_string()
}

/// Kinds of STAC objects the ML-AOI fields can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Collection,
    Item,
    Asset,
    Link,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [Self::Collection, Self::Item, Self::Asset, Self::Link];

    /// Map the `type` member of a STAC document to an object kind
    pub fn from_stac_type(stac_type: &str) -> Option<Self> {
        match stac_type {
            "Feature" => Some(Self::Item),
            "Collection" => Some(Self::Collection),
            _ => None,
        }
    }

    /// Detect the kind of a raw STAC document
    pub fn of_document(document: &Value) -> Option<Self> {
        document
            .get("type")
            .and_then(Value::as_str)
            .and_then(Self::from_stac_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "Collection",
            Self::Item => "Item",
            Self::Asset => "Asset",
            Self::Link => "Link",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access to the `stac_extensions` declaration of a STAC object
pub trait Extensions {
    fn extensions(&self) -> &[String];

    fn extensions_mut(&mut self) -> &mut Vec<String>;

    /// Check whether the given schema URI is declared
    fn has_extension(&self, uri: &str) -> bool {
        self.extensions().iter().any(|declared| declared == uri)
    }

    /// Declare a schema URI, keeping the list free of duplicates
    fn add_extension(&mut self, uri: &str) {
        if !self.has_extension(uri) {
            self.extensions_mut().push(uri.to_string());
        }
    }

    fn remove_extension(&mut self, uri: &str) {
        self.extensions_mut().retain(|declared| declared != uri);
    }
}

/// Common surface of the top-level STAC objects (Items and Collections)
pub trait StacObject: Extensions {
    /// Kind reported in errors and used for field placement
    const KIND: ObjectKind;

    fn id(&self) -> &str;

    fn assets(&self) -> &BTreeMap<String, Asset>;

    fn assets_mut(&mut self) -> &mut BTreeMap<String, Asset>;

    fn links(&self) -> &[Link];

    fn links_mut(&mut self) -> &mut Vec<Link>;

    /// Borrow an asset mutably together with the owner's read-only properties
    ///
    /// Asset readers fall back to the owner properties when the asset itself
    /// does not carry a field. Only Items expose such properties.
    fn asset_with_owner_properties(&mut self, key: &str) -> Option<(&mut Asset, Option<&Properties>)>;
}

macro_rules! impl_extensions {
    ($($ty:ty),*) => {
        $(
            impl Extensions for $ty {
                fn extensions(&self) -> &[String] {
                    &self.stac_extensions
                }

                fn extensions_mut(&mut self) -> &mut Vec<String> {
                    &mut self.stac_extensions
                }
            }
        )*
    };
}

impl_extensions!(Item, Collection);

/// Errors raised when interpreting a raw JSON document as a STAC object
#[derive(Debug, Error)]
pub enum StacError {
    /// The `type` member is missing or not a supported STAC object type
    #[error("Unsupported STAC object type {found:?}, expected \"Feature\" or \"Collection\"")]
    UnknownType { found: Option<String> },

    /// The document does not match the STAC object layout
    #[error("Invalid STAC {kind}: {source}")]
    Invalid {
        kind: ObjectKind,
        source: serde_json::Error,
    },
}

/// Either of the top-level STAC objects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StacValue {
    Item(Item),
    Collection(Collection),
}

impl StacValue {
    /// Interpret a raw JSON document, dispatching on its `type` member
    pub fn from_value(document: Value) -> Result<Self, StacError> {
        match ObjectKind::of_document(&document) {
            Some(ObjectKind::Item) => serde_json::from_value(document)
                .map(Self::Item)
                .map_err(|source| StacError::Invalid {
                    kind: ObjectKind::Item,
                    source,
                }),
            Some(ObjectKind::Collection) => serde_json::from_value(document)
                .map(Self::Collection)
                .map_err(|source| StacError::Invalid {
                    kind: ObjectKind::Collection,
                    source,
                }),
            _ => Err(StacError::UnknownType {
                found: document
                    .get("type")
                    .map(|t| t.as_str().map(str::to_string).unwrap_or_else(|| t.to_string())),
            }),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Item(_) => ObjectKind::Item,
            Self::Collection(_) => ObjectKind::Collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Item(item) => &item.id,
            Self::Collection(collection) => &collection.id,
        }
    }

    pub fn has_extension(&self, uri: &str) -> bool {
        match self {
            Self::Item(item) => item.has_extension(uri),
            Self::Collection(collection) => collection.has_extension(uri),
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Item(item) => Some(item),
            Self::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            Self::Item(_) => None,
        }
    }

    /// Serialize back to a JSON document
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl From<Item> for StacValue {
    fn from(item: Item) -> Self {
        Self::Item(item)
    }
}

impl From<Collection> for StacValue {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_kind_detection() {
        assert_eq!(ObjectKind::of_document(&json!({"type": "Feature"})), Some(ObjectKind::Item));
        assert_eq!(
            ObjectKind::of_document(&json!({"type": "Collection"})),
            Some(ObjectKind::Collection)
        );
        assert_eq!(ObjectKind::of_document(&json!({"type": "Catalog"})), None);
        assert_eq!(ObjectKind::of_document(&json!({})), None);
    }

    #[test]
    fn test_extensions_are_not_duplicated() {
        let mut item = Item::new("test");
        item.add_extension("https://example.com/schema.json");
        item.add_extension("https://example.com/schema.json");
        assert_eq!(item.stac_extensions.len(), 1);

        item.remove_extension("https://example.com/schema.json");
        assert!(item.stac_extensions.is_empty());
    }

    #[test]
    fn test_stac_value_dispatch() {
        let item = StacValue::from_value(json!({
            "type": "Feature",
            "stac_version": "1.0.0",
            "id": "item-1",
            "geometry": null,
            "properties": {"datetime": null},
            "links": [],
            "assets": {}
        }))
        .unwrap();
        assert_eq!(item.kind(), ObjectKind::Item);
        assert_eq!(item.id(), "item-1");

        let err = StacValue::from_value(json!({"type": "Catalog", "id": "c"})).unwrap_err();
        assert!(matches!(err, StacError::UnknownType { found: Some(ref t) } if t == "Catalog"));
    }
}
