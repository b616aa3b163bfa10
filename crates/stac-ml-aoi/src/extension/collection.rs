//! ML-AOI fields at the top level of a STAC Collection
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use super::{typed, untyped, ExtensionResult, MlAoiExtension, SummariesExtension};
use crate::fields::{CollectionFields, FieldName, Split};
use crate::stac::Collection;
use serde_json::{Map, Value};
use std::fmt;

/// Extension accessor over the top-level fields of a Collection
pub struct CollectionExtension<'a> {
    collection: &'a mut Collection,
}

impl<'a> CollectionExtension<'a> {
    pub(crate) fn new(collection: &'a mut Collection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &Collection {
        self.collection
    }

    pub fn split(&self) -> ExtensionResult<Option<Split>> {
        typed(self.properties().get(FieldName::Split.key()))
    }

    pub fn set_split(&mut self, split: Option<Split>) -> ExtensionResult<()> {
        self.set_property(FieldName::Split.key(), untyped(split))
    }

    /// Switch to the summaries of the same Collection
    pub fn summaries(self) -> SummariesExtension<'a> {
        SummariesExtension::new(self.collection)
    }
}

impl MlAoiExtension for CollectionExtension<'_> {
    type Fields = CollectionFields;

    fn properties(&self) -> &Map<String, Value> {
        &self.collection.additional_fields
    }

    fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.collection.additional_fields
    }
}

impl fmt::Debug for CollectionExtension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionExtension").field("id", &self.collection.id).finish()
    }
}
