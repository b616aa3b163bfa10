//! ML-AOI properties of a STAC Item
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use super::{typed, untyped, ExtensionResult, MlAoiExtension};
use crate::fields::{FieldName, ItemFields, ResamplingMethod, Role, Split};
use crate::stac::{Asset, Item};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Extension accessor over the properties of an Item
pub struct ItemExtension<'a> {
    item: &'a mut Item,
}

impl<'a> ItemExtension<'a> {
    pub(crate) fn new(item: &'a mut Item) -> Self {
        Self { item }
    }

    /// The extended Item
    pub fn item(&self) -> &Item {
        self.item
    }

    pub fn split(&self) -> ExtensionResult<Option<Split>> {
        typed(self.properties().get(FieldName::Split.key()))
    }

    /// Set or clear (`None`) the split of the Item
    pub fn set_split(&mut self, split: Option<Split>) -> ExtensionResult<()> {
        self.set_property(FieldName::Split.key(), untyped(split))
    }

    /// Select the Item assets matching every criterion of the filter
    ///
    /// Asset fields are read from the asset first and from the Item
    /// properties when the asset does not define them.
    pub fn assets(&self, filter: &AssetFilter) -> BTreeMap<&str, &Asset> {
        self.item
            .assets
            .iter()
            .filter(|(_, asset)| filter.matches(asset, Some(&self.item.properties)))
            .map(|(key, asset)| (key.as_str(), asset))
            .collect()
    }
}

impl MlAoiExtension for ItemExtension<'_> {
    type Fields = ItemFields;

    fn properties(&self) -> &Map<String, Value> {
        &self.item.properties
    }

    fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.item.properties
    }
}

impl fmt::Debug for ItemExtension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemExtension").field("id", &self.item.id).finish()
    }
}

/// Criteria for selecting assets by their ML-AOI fields
///
/// An asset matches when its role is one of `roles`; an empty list stands
/// for every role, so assets without a valid `ml-aoi:role` never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFilter {
    pub roles: Vec<Role>,
    pub reference_grid: Option<bool>,
    pub resampling_method: Option<ResamplingMethod>,
}

impl AssetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        for role in roles {
            self = self.with_role(role);
        }
        self
    }

    pub fn with_reference_grid(mut self, reference_grid: bool) -> Self {
        self.reference_grid = Some(reference_grid);
        self
    }

    pub fn with_resampling_method(mut self, method: ResamplingMethod) -> Self {
        self.resampling_method = Some(method);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.reference_grid.is_none() && self.resampling_method.is_none()
    }

    /// Check an asset, falling back to the owner properties for missing fields
    pub fn matches(&self, asset: &Asset, owner_properties: Option<&Map<String, Value>>) -> bool {
        let lookup = |field: FieldName| {
            asset
                .additional_fields
                .get(field.key())
                .or_else(|| owner_properties.and_then(|properties| properties.get(field.key())))
        };

        let wanted = if self.roles.is_empty() { Role::ALL } else { self.roles.as_slice() };
        match role_of(lookup(FieldName::Role)) {
            Some(role) if wanted.contains(&role) => {}
            _ => return false,
        }

        if let Some(expected) = self.reference_grid {
            if lookup(FieldName::ReferenceGrid).and_then(Value::as_bool) != Some(expected) {
                return false;
            }
        }

        if let Some(expected) = self.resampling_method {
            if lookup(FieldName::ResamplingMethod).and_then(Value::as_str) != Some(expected.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Role stored as a single string; lists and unknown values have none
fn role_of(value: Option<&Value>) -> Option<Role> {
    value.and_then(Value::as_str).and_then(|role| role.parse().ok())
}
