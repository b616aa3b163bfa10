//! Migration of legacy ML-AOI extension declarations
//!
//! Documents written against earlier releases declare the extension by its
//! short identifier (`ml-aoi`) or by an older versioned schema URI. The
//! hooks rewrite those declarations to the current schema URI.
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::stac::ObjectKind;
use crate::{SCHEMA_ID, SCHEMA_URI, SCHEMA_URI_BASE};
use serde_json::Value;
use tracing::debug;

/// Declaration migration rules of an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionHooks {
    /// Current schema URI
    pub schema_uri: &'static str,
    /// Base shared by every versioned schema URI
    pub uri_base: &'static str,
    /// Identifiers used before versioned schema URIs
    pub prev_extension_ids: &'static [&'static str],
    /// Object kinds whose declarations are migrated
    pub object_types: &'static [ObjectKind],
}

/// Hooks of the ML-AOI extension
pub const ML_AOI_HOOKS: ExtensionHooks = ExtensionHooks {
    schema_uri: SCHEMA_URI,
    uri_base: SCHEMA_URI_BASE,
    prev_extension_ids: &[SCHEMA_ID],
    object_types: &[ObjectKind::Collection, ObjectKind::Item],
};

impl ExtensionHooks {
    /// Whether a declared extension is a previous form of this one
    pub fn is_previous(&self, declared: &str) -> bool {
        if declared == self.schema_uri {
            return false;
        }
        if self.prev_extension_ids.contains(&declared) {
            return true;
        }
        declared
            .strip_prefix(self.uri_base)
            .and_then(|rest| rest.strip_suffix("/schema.json"))
            .is_some_and(|version| version.starts_with('v'))
    }

    /// Rewrite previous declarations of a raw document to the current URI
    ///
    /// Returns true when the document was changed.
    pub fn migrate(&self, document: &mut Value) -> bool {
        let Some(kind) = ObjectKind::of_document(document) else {
            return false;
        };
        if !self.object_types.contains(&kind) {
            return false;
        }
        let Some(declared) = document.get_mut("stac_extensions").and_then(Value::as_array_mut) else {
            return false;
        };

        let mut found_previous = false;
        declared.retain(|entry| match entry.as_str() {
            Some(uri) if self.is_previous(uri) => {
                debug!(previous = uri, current = self.schema_uri, "Migrating extension declaration");
                found_previous = true;
                false
            }
            _ => true,
        });

        if !found_previous {
            return false;
        }

        let has_current = declared.iter().any(|entry| entry.as_str() == Some(self.schema_uri));
        if !has_current {
            declared.push(Value::String(self.schema_uri.to_string()));
        }
        debug!(kind = %kind, "Migrated extension declarations");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_previous() {
        assert!(ML_AOI_HOOKS.is_previous("ml-aoi"));
        assert!(ML_AOI_HOOKS.is_previous("https://stac-extensions.github.io/ml-aoi/v0.1.0/schema.json"));
        assert!(!ML_AOI_HOOKS.is_previous(SCHEMA_URI));
        assert!(!ML_AOI_HOOKS.is_previous("https://stac-extensions.github.io/label/v1.0.1/schema.json"));
    }

    #[test]
    fn test_migrate_legacy_identifier() {
        let mut document = json!({
            "type": "Feature",
            "id": "item-1",
            "stac_extensions": [
                "ml-aoi",
                "https://stac-extensions.github.io/label/v1.0.1/schema.json"
            ]
        });
        assert!(ML_AOI_HOOKS.migrate(&mut document));
        assert_eq!(
            document["stac_extensions"],
            json!([
                "https://stac-extensions.github.io/label/v1.0.1/schema.json",
                SCHEMA_URI
            ])
        );

        // already migrated
        assert!(!ML_AOI_HOOKS.migrate(&mut document));
    }

    #[test]
    fn test_migrate_keeps_single_current_declaration() {
        let mut document = json!({
            "type": "Collection",
            "id": "c",
            "stac_extensions": [
                "https://stac-extensions.github.io/ml-aoi/v0.1.0/schema.json",
                SCHEMA_URI
            ]
        });
        assert!(ML_AOI_HOOKS.migrate(&mut document));
        assert_eq!(document["stac_extensions"], json!([SCHEMA_URI]));
    }

    #[test]
    fn test_migrate_ignores_other_objects() {
        let mut catalog = json!({"type": "Catalog", "id": "c", "stac_extensions": ["ml-aoi"]});
        assert!(!ML_AOI_HOOKS.migrate(&mut catalog));
        assert_eq!(catalog["stac_extensions"], json!(["ml-aoi"]));
    }
}
