//! ML-AOI fields of a STAC Link
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use super::{typed, untyped, ExtensionResult, MlAoiExtension};
use crate::fields::{FieldName, LinkFields, Role};
use crate::stac::Link;
use serde_json::{Map, Value};
use std::fmt;

/// Extension accessor over a Link
pub struct LinkExtension<'a> {
    link: &'a mut Link,
}

impl<'a> LinkExtension<'a> {
    pub fn new(link: &'a mut Link) -> Self {
        Self { link }
    }

    pub fn link(&self) -> &Link {
        self.link
    }

    pub fn role(&self) -> ExtensionResult<Option<Role>> {
        typed(self.properties().get(FieldName::Role.key()))
    }

    pub fn set_role(&mut self, role: Option<Role>) -> ExtensionResult<()> {
        self.set_property(FieldName::Role.key(), untyped(role))
    }
}

impl MlAoiExtension for LinkExtension<'_> {
    type Fields = LinkFields;

    fn properties(&self) -> &Map<String, Value> {
        &self.link.additional_fields
    }

    fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.link.additional_fields
    }
}

impl fmt::Debug for LinkExtension<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkExtension")
            .field("rel", &self.link.rel)
            .field("href", &self.link.href)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::MlAoi;
    use crate::stac::Item;
    use serde_json::json;

    #[test]
    fn test_link_role() {
        let mut item = Item::new("item-1").with_link(Link::new("source.json", "derived_from"));
        let mut ext = MlAoi::link(&mut item, 0, true).unwrap();
        ext.set_role(Some(Role::Feature)).unwrap();
        assert_eq!(ext.role().unwrap(), Some(Role::Feature));
        assert_eq!(format!("{:?}", ext), r#"LinkExtension { rel: "derived_from", href: "source.json" }"#);

        let document = serde_json::to_value(&item).unwrap();
        assert_eq!(document["links"][0]["ml-aoi:role"], json!("feature"));
    }

    #[test]
    fn test_link_rejects_asset_fields() {
        let mut link = Link::new("labels.geojson", "item");
        let mut ext = LinkExtension::new(&mut link);
        assert!(ext.set_property("reference_grid", true).is_err());
        assert!(ext.apply_value(json!({"ml-aoi:role": "label"})).is_ok());
        assert_eq!(link.additional_fields["ml-aoi:role"], json!("label"));
    }
}
