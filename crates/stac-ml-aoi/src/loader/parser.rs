//! Document parsing for JSON, GeoJSON and YAML files
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON format (.json, .geojson)
    Json,
    /// YAML format (.yaml, .yml)
    Yaml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json" | "geojson") => Ok(Format::Json),
            Some("yaml" | "yml") => Ok(Format::Yaml),
            _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json", "geojson"],
            Format::Yaml => &["yaml", "yml"],
        }
    }
}

/// Parser turning document files into JSON values
#[derive(Debug, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a file, detecting the format from its extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<Value> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        self.parse_content(&content, format, path)
    }

    /// Parse content with explicit format
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, path),
            Format::Json => self.parse_json(content, path),
        }
    }

    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        // Parse as YAML first to report YAML-specific errors
        let yaml_value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))?;

        serde_json::to_value(yaml_value).map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content).map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Serialize a value in the given format
    pub fn serialize(&self, value: &Value, format: Format, path: &Path) -> LoaderResult<String> {
        match format {
            Format::Json => serde_json::to_string_pretty(value)
                .map(|mut content| {
                    content.push('\n');
                    content
                })
                .map_err(|e| LoaderError::serialize_error(path.to_path_buf(), e.to_string())),
            Format::Yaml => serde_yaml::to_string(value)
                .map_err(|e| LoaderError::serialize_error(path.to_path_buf(), e.to_string())),
        }
    }
}
