//! Configuration management
//!
//! Settings are merged from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables (`VERITAS_DEFAULT_LOCALE`, `VERITAS_MAX_PASSES`,
//!   `VERITAS_BUNDLE_DIR`)
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use crate::bundle::CacheConfig;
use crate::error::{Error, Result};
use crate::interpolation::InterpolationConfig;
use crate::types::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default base name of message bundle files
pub const DEFAULT_BUNDLE_BASE_NAME: &str = "ValidationMessages";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VeritasConfig {
    /// Message interpolation settings
    pub interpolation: InterpolationConfig,

    /// Resource bundle cache settings
    pub cache: CacheConfig,

    /// Where caller-supplied message bundles live
    pub bundles: BundleConfig,
}

/// Location of message bundle files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Directory holding the bundle files; no caller bundles when unset
    pub directory: Option<PathBuf>,

    /// File name prefix, e.g. `ValidationMessages_de.properties`
    pub base_name: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            directory: None,
            base_name: DEFAULT_BUNDLE_BASE_NAME.to_string(),
        }
    }
}

impl VeritasConfig {
    /// Load configuration from a YAML or JSON file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        let config: Self = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "Unsupported configuration format for '{}'. Expected .yaml, .yml, or .json",
                    path.display()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source
    pub fn merge_with_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup("VERITAS_DEFAULT_LOCALE") {
            self.interpolation.default_locale = Locale::parse(&locale);
        }

        if let Some(passes) = lookup("VERITAS_MAX_PASSES") {
            self.interpolation.max_passes = passes.trim().parse().map_err(|_| {
                Error::config(format!("VERITAS_MAX_PASSES must be a positive integer, got '{}'", passes))
            })?;
        }

        if let Some(dir) = lookup("VERITAS_BUNDLE_DIR") {
            self.bundles.directory = Some(PathBuf::from(dir));
        }

        self.validate()
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.interpolation.max_passes == 0 {
            return Err(Error::config("interpolation.max_passes must be at least 1"));
        }
        if self.bundles.base_name.trim().is_empty() {
            return Err(Error::config("bundles.base_name must not be empty"));
        }
        Ok(())
    }
}
