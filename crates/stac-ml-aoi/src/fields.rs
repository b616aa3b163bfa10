//! ML-AOI field definitions and typed field records
//!
//! Every ML-AOI field is optional, but a record is only valid when at least
//! one of its fields is set. Records deserialize from prefixed keys
//! (`ml-aoi:split`) as well as from bare names (`split`), and always
//! serialize with prefixed keys.
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::extension::error::{ExtensionError, ExtensionResult};
use crate::stac::ObjectKind;
use crate::{PREFIX, PROPERTY_PREFIX};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Prefix a field name with `ml-aoi:`
///
/// Names containing `datetime` are STAC core fields and are never namespaced.
pub fn add_prefix(name: &str) -> Cow<'_, str> {
    if name.contains("datetime") || name.starts_with(PREFIX) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{}{}", PREFIX, name))
    }
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// All accepted values, in schema order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Accepted values joined for error messages
            pub fn expected() -> String {
                format!(
                    "one of: {}",
                    Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
                )
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ExtensionError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(ExtensionError::invalid_value(
                        $field,
                        Value::String(value.to_string()),
                        Self::expected(),
                    )),
                }
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::String(value.as_str().to_string())
            }
        }
    };
}

string_enum!(
    /// Machine-learning split a Collection or Item belongs to
    Split, "ml-aoi:split" {
        Train => "train",
        Validate => "validate",
        Test => "test",
    }
);

string_enum!(
    /// Whether an Asset or Link provides labels or features
    Role, "ml-aoi:role" {
        Label => "label",
        Feature => "feature",
    }
);

string_enum!(
    /// GDAL warp resampling method (<https://gdal.org/programs/gdalwarp.html#cmdoption-gdalwarp-r>)
    ResamplingMethod, "ml-aoi:resampling-method" {
        Near => "near",
        Bilinear => "bilinear",
        Cubic => "cubic",
        CubicSpline => "cubicspline",
        Lanczos => "lanczos",
        Average => "average",
        Rms => "rms",
        Mode => "mode",
        Max => "max",
        Min => "min",
        Med => "med",
        Q1 => "q1",
        Q3 => "q3",
        Sum => "sum",
    }
);

/// The fields defined by the ML-AOI extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Split,
    Role,
    ReferenceGrid,
    ResamplingMethod,
}

impl FieldName {
    pub const ALL: [FieldName; 4] = [
        FieldName::Split,
        FieldName::Role,
        FieldName::ReferenceGrid,
        FieldName::ResamplingMethod,
    ];

    /// Serialized key, including the `ml-aoi:` prefix
    pub fn key(&self) -> &'static str {
        match self {
            Self::Split => "ml-aoi:split",
            Self::Role => "ml-aoi:role",
            Self::ReferenceGrid => "ml-aoi:reference-grid",
            Self::ResamplingMethod => "ml-aoi:resampling-method",
        }
    }

    /// Key without the prefix
    pub fn suffix(&self) -> &'static str {
        &self.key()[PREFIX.len()..]
    }

    /// Attribute-style name (`reference_grid`)
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Role => "role",
            Self::ReferenceGrid => "reference_grid",
            Self::ResamplingMethod => "resampling_method",
        }
    }

    /// Object kinds this field may be attached to
    pub fn applies_to(&self, kind: ObjectKind) -> bool {
        match self {
            Self::Split => matches!(kind, ObjectKind::Collection | ObjectKind::Item),
            Self::Role => matches!(kind, ObjectKind::Asset | ObjectKind::Link),
            Self::ReferenceGrid | Self::ResamplingMethod => kind == ObjectKind::Asset,
        }
    }

    /// Fields defined for the given object kind
    pub fn for_kind(kind: ObjectKind) -> impl Iterator<Item = FieldName> {
        Self::ALL.into_iter().filter(move |field| field.applies_to(kind))
    }

    /// Exact match on the serialized key
    pub fn from_key(key: &str) -> Option<FieldName> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Resolve any accepted spelling of a field name
    ///
    /// Accepts `ml-aoi:reference-grid`, `ml_aoi_reference_grid`,
    /// `reference_grid` and `reference-grid`.
    pub fn from_name(name: &str) -> Option<FieldName> {
        let bare = name
            .strip_prefix(PREFIX)
            .or_else(|| name.strip_prefix(PROPERTY_PREFIX))
            .unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|field| field.suffix() == bare || field.attribute() == bare)
    }

    /// Description of the accepted values
    pub fn expected(&self) -> String {
        match self {
            Self::Split => Split::expected(),
            Self::Role => Role::expected(),
            Self::ReferenceGrid => "a boolean".to_string(),
            Self::ResamplingMethod => ResamplingMethod::expected(),
        }
    }

    /// Check a JSON value against the field type
    pub fn check_value(&self, value: &Value) -> ExtensionResult<()> {
        let valid = match self {
            Self::Split => value.as_str().is_some_and(|v| v.parse::<Split>().is_ok()),
            Self::Role => value.as_str().is_some_and(|v| v.parse::<Role>().is_ok()),
            Self::ReferenceGrid => value.is_boolean(),
            Self::ResamplingMethod => value
                .as_str()
                .is_some_and(|v| v.parse::<ResamplingMethod>().is_ok()),
        };

        if valid {
            Ok(())
        } else {
            Err(ExtensionError::invalid_value(self.key(), value.clone(), self.expected()))
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether a property name addresses the ML-AOI extension for the given kind
pub fn is_ml_aoi_property(name: &str, kind: ObjectKind) -> bool {
    name.starts_with(PREFIX)
        || name.starts_with(PROPERTY_PREFIX)
        || FieldName::for_kind(kind).any(|field| field.attribute() == name || field.suffix() == name)
}

/// Resolve a property name to a field of the given kind
///
/// When `required` is false, names that do not address the extension resolve
/// to `None` and are handled as plain host properties.
pub fn resolve(name: &str, kind: ObjectKind, required: bool) -> ExtensionResult<Option<FieldName>> {
    if !required && !is_ml_aoi_property(name, kind) {
        return Ok(None);
    }

    match FieldName::from_name(name) {
        Some(field) if field.applies_to(kind) => Ok(Some(field)),
        _ => Err(ExtensionError::InvalidField {
            name: name.to_string(),
            kind,
        }),
    }
}

/// Shared behaviour of the typed ML-AOI field records
pub trait MlAoiFields: Serialize + DeserializeOwned + Default + Clone + fmt::Debug {
    /// Object kind the record applies to
    const KIND: ObjectKind;

    /// Type name used in mismatch errors
    const NAME: &'static str;

    /// True when no field is set
    fn is_empty(&self) -> bool;

    /// All fields are optional, but at least one is required
    fn validate(&self) -> ExtensionResult<()> {
        if self.is_empty() {
            Err(ExtensionError::NoFields)
        } else {
            Ok(())
        }
    }

    /// Validate and serialize to prefixed keys, omitting unset fields
    fn to_properties(&self) -> ExtensionResult<Map<String, Value>> {
        self.validate()?;
        match serde_json::to_value(self)? {
            Value::Object(properties) => Ok(properties),
            other => Err(ExtensionError::invalid_value(
                Self::NAME,
                other,
                "a JSON object".to_string(),
            )),
        }
    }

    /// Read the record from a host property bag
    ///
    /// Only prefixed keys are considered so that unrelated host properties
    /// sharing a bare field name are never picked up.
    fn from_properties(properties: &Map<String, Value>) -> ExtensionResult<Self> {
        let prefixed: Map<String, Value> = properties
            .iter()
            .filter(|(key, _)| key.starts_with(PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(serde_json::from_value(Value::Object(prefixed))?)
    }

    /// Parse a record from user-provided JSON, accepting bare or prefixed names
    ///
    /// A field spelled several ways takes the value of its prefixed key.
    fn from_value(value: Value) -> ExtensionResult<Self> {
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                return Err(ExtensionError::invalid_value(
                    Self::NAME,
                    other,
                    "a JSON object".to_string(),
                ))
            }
        };
        Ok(serde_json::from_value(Value::Object(canonical_keys(entries)))?)
    }
}

/// Rename every known field spelling to its prefixed key
///
/// The prefixed key overrides other spellings; among the rest the first one
/// seen is kept.
fn canonical_keys(entries: Map<String, Value>) -> Map<String, Value> {
    let mut canonical = Map::with_capacity(entries.len());
    for (name, value) in entries {
        match FieldName::from_name(&name) {
            Some(field) if name == field.key() => {
                canonical.insert(name, value);
            }
            Some(field) => {
                canonical.entry(field.key()).or_insert(value);
            }
            None => {
                canonical.insert(name, value);
            }
        }
    }
    canonical
}

/// ML-AOI fields of a STAC Collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionFields {
    #[serde(
        rename = "ml-aoi:split",
        alias = "split",
        alias = "ml_aoi_split",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub split: Option<Split>,
}

impl MlAoiFields for CollectionFields {
    const KIND: ObjectKind = ObjectKind::Collection;
    const NAME: &'static str = "CollectionFields";

    fn is_empty(&self) -> bool {
        self.split.is_none()
    }
}

/// ML-AOI properties of a STAC Item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(
        rename = "ml-aoi:split",
        alias = "split",
        alias = "ml_aoi_split",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub split: Option<Split>,
}

impl MlAoiFields for ItemFields {
    const KIND: ObjectKind = ObjectKind::Item;
    const NAME: &'static str = "ItemFields";

    fn is_empty(&self) -> bool {
        self.split.is_none()
    }
}

/// ML-AOI fields of a STAC Asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFields {
    #[serde(
        rename = "ml-aoi:role",
        alias = "role",
        alias = "ml_aoi_role",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,

    #[serde(
        rename = "ml-aoi:reference-grid",
        alias = "reference-grid",
        alias = "reference_grid",
        alias = "ml_aoi_reference_grid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_grid: Option<bool>,

    #[serde(
        rename = "ml-aoi:resampling-method",
        alias = "resampling-method",
        alias = "resampling_method",
        alias = "ml_aoi_resampling_method",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resampling_method: Option<ResamplingMethod>,
}

impl MlAoiFields for AssetFields {
    const KIND: ObjectKind = ObjectKind::Asset;
    const NAME: &'static str = "AssetFields";

    fn is_empty(&self) -> bool {
        self.role.is_none() && self.reference_grid.is_none() && self.resampling_method.is_none()
    }
}

/// ML-AOI fields of a STAC Link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFields {
    #[serde(
        rename = "ml-aoi:role",
        alias = "role",
        alias = "ml_aoi_role",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
}

impl MlAoiFields for LinkFields {
    const KIND: ObjectKind = ObjectKind::Link;
    const NAME: &'static str = "LinkFields";

    fn is_empty(&self) -> bool {
        self.role.is_none()
    }
}

/// A field record whose kind is only known at run time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    Collection(CollectionFields),
    Item(ItemFields),
    Asset(AssetFields),
    Link(LinkFields),
}

impl Fields {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Collection(_) => CollectionFields::KIND,
            Self::Item(_) => ItemFields::KIND,
            Self::Asset(_) => AssetFields::KIND,
            Self::Link(_) => LinkFields::KIND,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Collection(_) => CollectionFields::NAME,
            Self::Item(_) => ItemFields::NAME,
            Self::Asset(_) => AssetFields::NAME,
            Self::Link(_) => LinkFields::NAME,
        }
    }

    /// Parse the record matching `kind` from user-provided JSON
    pub fn from_value(kind: ObjectKind, value: Value) -> ExtensionResult<Self> {
        Ok(match kind {
            ObjectKind::Collection => Self::Collection(CollectionFields::from_value(value)?),
            ObjectKind::Item => Self::Item(ItemFields::from_value(value)?),
            ObjectKind::Asset => Self::Asset(AssetFields::from_value(value)?),
            ObjectKind::Link => Self::Link(LinkFields::from_value(value)?),
        })
    }

    pub fn validate(&self) -> ExtensionResult<()> {
        match self {
            Self::Collection(fields) => fields.validate(),
            Self::Item(fields) => fields.validate(),
            Self::Asset(fields) => fields.validate(),
            Self::Link(fields) => fields.validate(),
        }
    }

    pub fn to_properties(&self) -> ExtensionResult<Map<String, Value>> {
        match self {
            Self::Collection(fields) => fields.to_properties(),
            Self::Item(fields) => fields.to_properties(),
            Self::Asset(fields) => fields.to_properties(),
            Self::Link(fields) => fields.to_properties(),
        }
    }
}

impl From<CollectionFields> for Fields {
    fn from(fields: CollectionFields) -> Self {
        Self::Collection(fields)
    }
}

impl From<ItemFields> for Fields {
    fn from(fields: ItemFields) -> Self {
        Self::Item(fields)
    }
}

impl From<AssetFields> for Fields {
    fn from(fields: AssetFields) -> Self {
        Self::Asset(fields)
    }
}

impl From<LinkFields> for Fields {
    fn from(fields: LinkFields) -> Self {
        Self::Link(fields)
    }
}
