//! Error types for the Veritas core library
//!
//! Descriptor construction is the only fallible operation of the metadata
//! layer: attribute extraction against a declaration can fail, and such a
//! failure surfaces as [`Error::Configuration`] carrying the constraint kind.
//! Interpolation and bundle lookup never fail.
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use crate::types::ConstraintKind;
use thiserror::Error;

/// Main error type for Veritas operations
#[derive(Error, Debug)]
pub enum Error {
    /// Descriptor construction failed while reading a declaration
    #[error("Unable to read constraint parameters of '{kind}': {message}")]
    Configuration {
        kind: ConstraintKind,
        message: String,
        #[source]
        source: Option<IntrospectionError>,
    },

    /// Invalid or unreadable configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a [`DeclarationIntrospector`](crate::metadata::DeclarationIntrospector)
/// while reading the attributes of a declaration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The kind is neither registered nor builtin
    #[error("unknown constraint kind '{kind}'")]
    UnknownKind { kind: ConstraintKind },

    /// An attribute has no declared value and no default
    #[error("attribute '{attribute}' of '{kind}' has no value and no default")]
    MissingAttribute {
        kind: ConstraintKind,
        attribute: String,
    },

    /// The declaration sets an attribute the kind does not define
    #[error("'{kind}' does not define an attribute named '{attribute}'")]
    UnknownAttribute {
        kind: ConstraintKind,
        attribute: String,
    },
}

impl IntrospectionError {
    /// The constraint kind the failure refers to
    pub fn kind(&self) -> &ConstraintKind {
        match self {
            IntrospectionError::UnknownKind { kind }
            | IntrospectionError::MissingAttribute { kind, .. }
            | IntrospectionError::UnknownAttribute { kind, .. } => kind,
        }
    }
}

impl Error {
    /// Wrap an introspection failure raised while building a descriptor for `kind`
    pub fn configuration(kind: ConstraintKind, source: IntrospectionError) -> Self {
        Error::Configuration {
            kind,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a configuration file error
    pub fn config<M: Into<String>>(message: M) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// The constraint kind of a configuration error, if any
    pub fn constraint_kind(&self) -> Option<&ConstraintKind> {
        match self {
            Error::Configuration { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
