//! ML-AOI summaries of a STAC Collection
//!
//! Summaries hold the list of values found across the Collection's Items,
//! so every accessor works on lists and validates each element.
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use super::{ExtensionError, ExtensionResult};
use crate::fields::{self, CollectionFields, FieldName, MlAoiFields, Split};
use crate::stac::{Collection, ObjectKind};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Extension accessor over the summaries of a Collection
pub struct SummariesExtension<'a> {
    collection: &'a mut Collection,
}

impl<'a> SummariesExtension<'a> {
    pub(crate) fn new(collection: &'a mut Collection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &Collection {
        self.collection
    }

    fn field(name: &str) -> ExtensionResult<FieldName> {
        fields::resolve(name, ObjectKind::Collection, true)?.ok_or_else(|| ExtensionError::InvalidField {
            name: name.to_string(),
            kind: ObjectKind::Collection,
        })
    }

    /// Summarized values of a field; a missing or scalar summary reads as a
    /// list of its values
    pub fn get_property(&self, name: &str) -> ExtensionResult<Option<Vec<Value>>> {
        let field = Self::field(name)?;
        Ok(self
            .collection
            .summaries
            .as_ref()
            .and_then(|summaries| summaries.get(field.key()))
            .map(|summary| match summary {
                Value::Array(values) => values.clone(),
                other => vec![other.clone()],
            }))
    }

    /// Validate every value and store the list; an empty list removes the summary
    pub fn set_property(&mut self, name: &str, values: Vec<Value>) -> ExtensionResult<()> {
        let field = Self::field(name)?;
        for value in &values {
            field.check_value(value)?;
        }

        if values.is_empty() {
            if let Some(summaries) = self.collection.summaries.as_mut() {
                summaries.remove(field.key());
                if summaries.is_empty() {
                    self.collection.summaries = None;
                }
            }
            debug!(field = field.key(), "Removed ML-AOI summary");
            return Ok(());
        }

        debug!(field = field.key(), count = values.len(), "Set ML-AOI summary");
        self.collection
            .summaries
            .get_or_insert_with(Default::default)
            .insert(field.key().to_string(), Value::Array(values));
        Ok(())
    }

    pub fn split(&self) -> ExtensionResult<Option<Vec<Split>>> {
        self.get_property(FieldName::Split.key())?
            .map(|values| {
                values
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<Split>, _>>()
            })
            .transpose()
            .map_err(ExtensionError::from)
    }

    pub fn set_split(&mut self, splits: Option<Vec<Split>>) -> ExtensionResult<()> {
        let values = splits
            .unwrap_or_default()
            .into_iter()
            .map(Value::from)
            .collect();
        self.set_property(FieldName::Split.key(), values)
    }

    /// Summarize a field record: each set field becomes a one-element list
    pub fn apply(&mut self, fields: CollectionFields) -> ExtensionResult<()> {
        for (key, value) in fields.to_properties()? {
            self.set_property(&key, vec![value])?;
        }
        Ok(())
    }
}

impl fmt::Debug for SummariesExtension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummariesExtension").field("id", &self.collection.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::MlAoi;
    use serde_json::json;

    fn collection() -> Collection {
        Collection::new("EuroSAT", "All splits", "MIT", Collection::global_extent())
    }

    #[test]
    fn test_split_summary() {
        let mut collection = collection();
        let mut summaries = MlAoi::summaries(&mut collection, true).unwrap();
        assert_eq!(summaries.split().unwrap(), None);

        summaries
            .set_split(Some(vec![Split::Train, Split::Validate, Split::Test]))
            .unwrap();
        assert_eq!(
            summaries.split().unwrap(),
            Some(vec![Split::Train, Split::Validate, Split::Test])
        );
        assert_eq!(
            collection.summaries.as_ref().unwrap()["ml-aoi:split"],
            json!(["train", "validate", "test"])
        );
    }

    #[test]
    fn test_every_element_is_validated() {
        let mut collection = collection();
        let mut summaries = MlAoi::summaries(&mut collection, true).unwrap();
        let err = summaries
            .set_property("split", vec![json!("train"), json!("training")])
            .unwrap_err();
        assert!(matches!(err, ExtensionError::InvalidValue { .. }));
        assert!(summaries.get_property("split").unwrap().is_none());
        assert!(summaries.get_property("role").is_err());
    }

    #[test]
    fn test_empty_list_removes_summary() {
        let mut collection = collection();
        let mut summaries = MlAoi::summaries(&mut collection, true).unwrap();
        summaries.apply(CollectionFields { split: Some(Split::Test) }).unwrap();
        assert_eq!(summaries.get_property("split").unwrap(), Some(vec![json!("test")]));

        summaries.set_split(None).unwrap();
        assert!(collection.summaries.is_none());
    }

    #[test]
    fn test_scalar_summary_reads_as_list() {
        let mut collection = collection();
        let mut map = serde_json::Map::new();
        map.insert("ml-aoi:split".to_string(), json!("validate"));
        collection.summaries = Some(map);

        let summaries = MlAoi::summaries(&mut collection, true).unwrap();
        assert_eq!(summaries.split().unwrap(), Some(vec![Split::Validate]));
        assert_eq!(format!("{:?}", summaries), r#"SummariesExtension { id: "EuroSAT" }"#);
    }
}
