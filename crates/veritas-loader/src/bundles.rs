//! Message bundles read from a directory of locale-suffixed files
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use crate::error::{LoaderError, LoaderResult};
use crate::parser::{DocumentParser, Format};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use veritas_core::types::display_value;
use veritas_core::{BundleConfig, BundleLocator, Locale, ResourceBundle};

/// Locator reading `<base>[_<lang>[_<COUNTRY>[_<variant>]]].<ext>` files
///
/// Files are looked up for every fallback candidate of the requested locale,
/// root first, and entries of more specific files replace those of less
/// specific ones. At each level the first existing file among `.properties`,
/// `.yaml`, `.yml` and `.json` is used. Structured files may nest keys,
/// `validator: { notNull: ... }` being read as `validator.notNull`. A level
/// whose file cannot be read is skipped with a warning.
///
/// Every call reads from disk; wrap it in a
/// [`CachingBundleLocator`](veritas_core::CachingBundleLocator).
#[derive(Debug, Clone)]
pub struct DirectoryBundleLocator {
    dir: PathBuf,
    base_name: String,
    parser: DocumentParser,
}

impl DirectoryBundleLocator {
    pub fn new<P: Into<PathBuf>, B: Into<String>>(dir: P, base_name: B) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            parser: DocumentParser::new(),
        }
    }

    /// Locator for the configured bundle directory, if one is set
    pub fn from_config(config: &BundleConfig) -> Option<Self> {
        config
            .directory
            .as_ref()
            .map(|dir| Self::new(dir.clone(), config.base_name.clone()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    fn find_file(&self, locale: &Locale) -> Option<PathBuf> {
        let stem = if locale.is_root() {
            self.base_name.clone()
        } else {
            format!("{}_{}", self.base_name, locale)
        };

        Format::ALL
            .iter()
            .flat_map(|format| format.extensions())
            .map(|ext| self.dir.join(format!("{}.{}", stem, ext)))
            .find(|path| path.is_file())
    }

    fn read_bundle(&self, path: &Path) -> LoaderResult<ResourceBundle> {
        let value = self.parser.parse_file(path)?;
        let Value::Object(entries) = value else {
            return Err(LoaderError::invalid_document(
                path.to_path_buf(),
                "message bundle must map keys to messages",
            ));
        };

        let mut bundle = ResourceBundle::new();
        flatten_into(&mut bundle, None, entries);
        Ok(bundle)
    }
}

fn flatten_into(bundle: &mut ResourceBundle, prefix: Option<&str>, entries: serde_json::Map<String, Value>) {
    for (key, value) in entries {
        let key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(bundle, Some(key.as_str()), nested),
            Value::Null => {}
            Value::String(message) => bundle.insert(key, message),
            other => bundle.insert(key, display_value(&other)),
        }
    }
}

impl BundleLocator for DirectoryBundleLocator {
    fn bundle(&self, locale: &Locale) -> Option<Arc<ResourceBundle>> {
        let mut merged: Option<ResourceBundle> = None;

        for candidate in locale.candidates().iter().rev() {
            let Some(path) = self.find_file(candidate) else {
                continue;
            };
            match self.read_bundle(&path) {
                Ok(bundle) => {
                    debug!(locale = %locale, path = %path.display(), entries = bundle.len(), "Read message bundle");
                    merged
                        .get_or_insert_with(ResourceBundle::new)
                        .extend_from(&bundle);
                }
                Err(error) => {
                    warn!(locale = %locale, path = %path.display(), %error, "Skipping unreadable message bundle");
                }
            }
        }

        merged.map(Arc::new)
    }
}
