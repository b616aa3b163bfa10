//! Error types for STAC document loading
//!
//! Copyright (c) 2025 STAC ML-AOI Contributors
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while reading or writing STAC documents
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML file '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON file '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported file format for '{path}'. Expected .json, .geojson, .yaml or .yml")]
    UnsupportedFormat { path: PathBuf },

    /// The `type` member is missing or not `Feature` / `Collection`
    #[error("Unsupported STAC object type {found:?} in '{path}', expected \"Feature\" or \"Collection\"")]
    UnknownObjectType { path: PathBuf, found: Option<String> },

    /// A specific object kind was requested but the document holds another
    #[error("Expected a STAC {expected} in '{path}', found a {found}")]
    UnexpectedObjectType {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// The document does not match the STAC object layout
    #[error("Invalid STAC document '{path}': {reason}")]
    DeserializeError { path: PathBuf, reason: String },

    #[error("Failed to write '{path}': {reason}")]
    SerializeError { path: PathBuf, reason: String },
}

impl LoaderError {
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::IoError { path, source: error }
    }

    pub fn yaml_parse_error(path: PathBuf, error: serde_yaml::Error) -> Self {
        Self::YamlParseError { path, source: error }
    }

    pub fn json_parse_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::JsonParseError { path, source: error }
    }

    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat { path }
    }

    pub fn deserialize_error(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::DeserializeError {
            path,
            reason: reason.into(),
        }
    }

    pub fn serialize_error(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::SerializeError {
            path,
            reason: reason.into(),
        }
    }

    /// Get the path associated with this error
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::IoError { path, .. }
            | Self::YamlParseError { path, .. }
            | Self::JsonParseError { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::UnknownObjectType { path, .. }
            | Self::UnexpectedObjectType { path, .. }
            | Self::DeserializeError { path, .. }
            | Self::SerializeError { path, .. } => path,
        }
    }

    /// Check whether a batch may continue past this error
    ///
    /// Problems with the document content are recoverable, failures to
    /// access the file system are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::IoError { .. } | Self::SerializeError { .. })
    }
}
