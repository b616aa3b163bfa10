//! Error types and handling for the CLI
//!
//! Library errors are wrapped with `#[from]` conversions and every variant
//! maps to its own process exit code.

use stac_ml_aoi::validation::SchemaError;
use stac_ml_aoi::{ExtensionError, LoaderError};
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Reading or writing ML-AOI fields failed
    #[error(transparent)]
    Extension(#[from] ExtensionError),

    /// Loading or saving a STAC document failed
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The ML-AOI schema could not be loaded
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// One or more documents are invalid
    #[error("{failed} of {total} document(s) failed validation")]
    ValidationFailed { failed: usize, total: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Extension(_) => 2,
            Self::Loader(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::Schema(_) => 5,
            Self::ValidationFailed { .. } => 6,
            Self::Config(_) => 7,
            Self::InvalidArgs(_) => 8,
            Self::Json(_) => 9,
            Self::Yaml(_) => 10,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::Io(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::FileNotFound { path: PathBuf::from("item.json") },
            Error::ValidationFailed { failed: 1, total: 2 },
            Error::config("bad"),
            Error::invalid_args("bad"),
            Error::other("bad"),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_validation_failed_message() {
        let error = Error::ValidationFailed { failed: 2, total: 3 };
        assert_eq!(error.to_string(), "2 of 3 document(s) failed validation");
        assert_eq!(format_error(&error, false), "Error: 2 of 3 document(s) failed validation");
        assert!(!error.should_show_help());
        assert!(Error::invalid_args("x").should_show_help());
    }

    #[test]
    fn test_extension_errors_are_transparent() {
        let error: Error = ExtensionError::NoFields.into();
        assert_eq!(error.to_string(), "ML-AOI extension must provide at least one valid field.");
        assert_eq!(error.exit_code(), 2);
    }
}
