//! Veritas Core - constraint metadata and violation message rendering
//!
//! This crate turns declarative constraint declarations into immutable
//! descriptors and renders human-readable violation messages from message
//! templates.
//!
//! # Main Components
//!
//! - **Metadata**: the [`MetadataRegistry`] table describing constraint kinds
//!   and the [`BuiltinValidators`] registry of builtin validator implementations
//! - **Descriptors**: [`DescriptorBuilder`] resolves groups, parameters,
//!   validators and composing constraints into a [`ConstraintDescriptor`] tree
//! - **Bundles**: [`BundleLocator`] implementations and the
//!   [`CachingBundleLocator`] in front of them
//! - **Interpolation**: [`MessageInterpolator`] resolves `{token}`
//!   placeholders against bundles and constraint parameters
//!
//! # Example
//!
//! ```rust
//! use veritas_core::{
//!     BuiltinValidators, ConstraintDeclaration, DescriptorBuilder, MessageInterpolator,
//!     MetadataRegistry, NoBundles,
//! };
//!
//! let registry = MetadataRegistry::with_builtins();
//! let validators = BuiltinValidators::standard();
//! let builder = DescriptorBuilder::new(&registry, &validators);
//!
//! let size = ConstraintDeclaration::new("Size").with_attribute("max", 8);
//! let descriptor = builder.build(&size, &[])?;
//!
//! let interpolator = MessageInterpolator::caching(NoBundles);
//! let message = interpolator.interpolate("{validator.size}", &descriptor, None);
//! assert_eq!(message, "size must be between 0 and 8");
//! # Ok::<(), veritas_core::Error>(())
//! ```
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

pub mod bundle;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod interpolation;
pub mod metadata;
pub mod types;

// Re-export main types for convenience
pub use bundle::{
    BundleLocator, CacheConfig, CachingBundleLocator, NoBundles, ResourceBundle,
    StaticBundleLocator,
};
pub use config::{BundleConfig, VeritasConfig};
pub use context::{ConstraintContext, ErrorMessage};
pub use descriptor::{ConstraintDescriptor, DescriptorBuilder};
pub use error::{Error, IntrospectionError, Result};
pub use interpolation::{InterpolationConfig, MessageInterpolator, ViolationMessage};
pub use metadata::{
    AttributeAccessor, BuiltinValidators, ConstraintDefinition, DeclarationIntrospector,
    MetaDeclaration, MetadataRegistry, OverrideDirective, OverridesParameter, ValidatorRegistry,
};
pub use types::{ConstraintDeclaration, ConstraintKind, Group, Locale, Parameters, ValidatorId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
