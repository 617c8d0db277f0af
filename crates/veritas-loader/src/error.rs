//! Error types for document loading operations
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while reading metadata documents and bundle files
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML file '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Malformed `.properties` content
    #[error("Failed to parse properties file '{path}' at line {line}: {reason}")]
    PropertiesParseError {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Unsupported file format
    #[error("Unsupported file format for '{path}'. Expected .yaml, .yml, .json, or .properties")]
    UnsupportedFormat { path: PathBuf },

    /// Well-formed document that does not describe a valid metadata table
    #[error("Invalid metadata document '{path}': {reason}")]
    InvalidDocument { path: PathBuf, reason: String },
}

impl From<std::io::Error> for LoaderError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::from("<unknown>"),
            source: error,
        }
    }
}

impl LoaderError {
    /// Create an I/O error with path context
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::IoError {
            path,
            source: error,
        }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse_error(path: PathBuf, error: serde_yaml::Error) -> Self {
        Self::YamlParseError {
            path,
            source: error,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::JsonParseError {
            path,
            source: error,
        }
    }

    pub fn properties_parse_error<R: Into<String>>(path: PathBuf, line: usize, reason: R) -> Self {
        Self::PropertiesParseError {
            path,
            line,
            reason: reason.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat { path }
    }

    pub fn invalid_document<R: Into<String>>(path: PathBuf, reason: R) -> Self {
        Self::InvalidDocument {
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
            | Self::PropertiesParseError { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::InvalidDocument { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let path = PathBuf::from("constraints.yaml");

        let io_err = LoaderError::io_error(
            path.clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        );
        assert!(matches!(io_err, LoaderError::IoError { .. }));
        assert_eq!(io_err.path(), &path);

        let invalid = LoaderError::invalid_document(path.clone(), "duplicate constraint kind 'Zip'");
        assert_eq!(
            invalid.to_string(),
            "Invalid metadata document 'constraints.yaml': duplicate constraint kind 'Zip'"
        );
    }

    #[test]
    fn test_properties_error_names_line() {
        let err = LoaderError::properties_parse_error(
            PathBuf::from("ValidationMessages.properties"),
            3,
            "malformed \\uxxxx encoding",
        );
        assert!(err.to_string().contains("at line 3"));
    }
}
