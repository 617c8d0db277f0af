//! Caching layer in front of a bundle locator
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use super::{BundleLocator, ResourceBundle};
use crate::types::Locale;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Configuration for cache behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether to cache at all; when disabled every lookup reaches the delegate
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Locator remembering the bundles its delegate found
///
/// Only hits are stored. A locale the delegate has no bundle for is asked
/// again on every lookup, so a bundle that appears later is picked up.
/// Concurrent lookups of an uncached locale may each call the delegate; the
/// delegate is never called while a cache shard is locked.
#[derive(Debug)]
pub struct CachingBundleLocator<L> {
    delegate: L,
    bundles: DashMap<Locale, Arc<ResourceBundle>>,
    config: CacheConfig,
}

impl<L: BundleLocator> CachingBundleLocator<L> {
    pub fn new(delegate: L) -> Self {
        Self::with_config(delegate, CacheConfig::default())
    }

    pub fn with_config(delegate: L, config: CacheConfig) -> Self {
        Self {
            delegate,
            bundles: DashMap::new(),
            config,
        }
    }

    pub fn delegate(&self) -> &L {
        &self.delegate
    }

    pub fn contains(&self, locale: &Locale) -> bool {
        self.bundles.contains_key(locale)
    }

    /// Number of cached locales
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Drop every cached bundle
    pub fn clear(&self) {
        self.bundles.clear();
    }
}

impl<L: BundleLocator> BundleLocator for CachingBundleLocator<L> {
    fn bundle(&self, locale: &Locale) -> Option<Arc<ResourceBundle>> {
        if !self.config.enabled {
            return self.delegate.bundle(locale);
        }

        let cached = self.bundles.get(locale).map(|entry| Arc::clone(entry.value()));
        if cached.is_some() {
            return cached;
        }

        let bundle = self.delegate.bundle(locale)?;
        debug!(locale = %locale, entries = bundle.len(), "Caching resource bundle");
        self.bundles.insert(locale.clone(), Arc::clone(&bundle));
        Some(bundle)
    }
}
