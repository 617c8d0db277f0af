//! Veritas Loader - file-backed metadata tables and message bundles
//!
//! This crate reads the inputs of [`veritas_core`] from disk:
//! - **Metadata documents**: YAML or JSON descriptions of constraint kinds,
//!   loaded into a [`MetadataRegistry`](veritas_core::MetadataRegistry) by
//!   [`RegistryLoader`]
//! - **Message bundles**: `.properties`, YAML or JSON files per locale, served
//!   by [`DirectoryBundleLocator`]
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use veritas_core::{BuiltinValidators, ConstraintDeclaration, DescriptorBuilder, VeritasConfig};
//! use veritas_loader::{message_interpolator, RegistryLoader};
//! use std::path::Path;
//!
//! let mut config = VeritasConfig::from_file(Path::new("veritas.yaml"))?;
//! config.merge_with_env()?;
//!
//! let registry = RegistryLoader::new().load_file(Path::new("constraints.yaml"))?;
//! let validators = BuiltinValidators::standard();
//! let descriptor = DescriptorBuilder::new(&registry, &validators)
//!     .build(&ConstraintDeclaration::new("PostalCode"), &[])?;
//!
//! let interpolator = message_interpolator(&config);
//! println!("{:?}", interpolator.default_message(&descriptor, None, &config.interpolation.default_locale));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

pub mod bundles;
pub mod error;
pub mod parser;
pub mod registry_loader;

pub use bundles::DirectoryBundleLocator;
pub use error::{LoaderError, LoaderResult};
pub use parser::{DocumentParser, Format};
pub use registry_loader::{MetadataDocument, RegistryLoader};

use std::sync::Arc;
use tracing::debug;
use veritas_core::{BundleLocator, CachingBundleLocator, MessageInterpolator, NoBundles, VeritasConfig};

/// Interpolator whose caller bundles come from the configured directory
pub type ConfiguredInterpolator = MessageInterpolator<CachingBundleLocator<Arc<dyn BundleLocator>>>;

/// Build the interpolator described by `config`
///
/// Without a bundle directory only the built-in default messages are used.
pub fn message_interpolator(config: &VeritasConfig) -> ConfiguredInterpolator {
    let bundles: Arc<dyn BundleLocator> = match DirectoryBundleLocator::from_config(&config.bundles) {
        Some(locator) => {
            debug!(dir = %locator.dir().display(), base_name = locator.base_name(), "Using bundle directory");
            Arc::new(locator)
        }
        None => Arc::new(NoBundles),
    };

    MessageInterpolator::caching_with_config(bundles, config.interpolation.clone(), config.cache.clone())
}
