//! Resource bundles and the locators resolving them per locale
//!
//! A [`BundleLocator`] turns a [`Locale`] into a [`ResourceBundle`], or
//! nothing when the locale is unsupported. [`CachingBundleLocator`] wraps any
//! locator and remembers its hits.
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

pub mod cache;
pub mod defaults;

pub use cache::{CacheConfig, CachingBundleLocator};
pub use defaults::default_bundle;

use crate::types::Locale;
use std::collections::HashMap;
use std::sync::Arc;

/// Locale-specific key to message table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBundle {
    entries: HashMap<String, String>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Add or replace one entry
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy entries of `other` into this bundle, replacing existing keys
    pub fn extend_from(&mut self, other: &ResourceBundle) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResourceBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolves the resource bundle of a locale
///
/// `None` is an expected outcome for unsupported locales, not an error.
/// Implementations may block, e.g. while reading from storage.
pub trait BundleLocator: Send + Sync {
    fn bundle(&self, locale: &Locale) -> Option<Arc<ResourceBundle>>;
}

impl<L: BundleLocator + ?Sized> BundleLocator for Arc<L> {
    fn bundle(&self, locale: &Locale) -> Option<Arc<ResourceBundle>> {
        (**self).bundle(locale)
    }
}

/// Locator that never finds a bundle
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBundles;

impl BundleLocator for NoBundles {
    fn bundle(&self, _locale: &Locale) -> Option<Arc<ResourceBundle>> {
        None
    }
}

/// In-memory locator over a fixed set of bundles
#[derive(Debug, Clone, Default)]
pub struct StaticBundleLocator {
    bundles: HashMap<Locale, Arc<ResourceBundle>>,
    fallback: Option<Arc<ResourceBundle>>,
}

impl StaticBundleLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bundle` for every locale
    pub fn single(bundle: ResourceBundle) -> Self {
        Self {
            bundles: HashMap::new(),
            fallback: Some(Arc::new(bundle)),
        }
    }

    /// Serve `bundle` for exactly `locale`
    pub fn with_bundle<L: Into<Locale>>(mut self, locale: L, bundle: ResourceBundle) -> Self {
        self.bundles.insert(locale.into(), Arc::new(bundle));
        self
    }
}

impl BundleLocator for StaticBundleLocator {
    fn bundle(&self, locale: &Locale) -> Option<Arc<ResourceBundle>> {
        self.bundles
            .get(locale)
            .or(self.fallback.as_ref())
            .cloned()
    }
}
