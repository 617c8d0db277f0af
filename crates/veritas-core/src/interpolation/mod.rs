//! Rendering of violation messages from message templates
//!
//! Tokens are resolved against the caller-supplied bundle of the requested
//! locale, then the built-in default bundle, then the constraint's
//! parameters. Since a bundle entry may itself contain tokens, substitution
//! repeats until a pass changes nothing or the pass limit is reached.
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

pub mod interpolator;
pub mod token;

pub use interpolator::{MessageInterpolator, ViolationMessage};

use crate::types::Locale;
use serde::{Deserialize, Serialize};

/// Upper bound on substitution passes unless configured otherwise
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Interpolation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Maximum number of substitution passes over a message
    pub max_passes: usize,
    /// Locale used when the caller does not name one
    pub default_locale: Locale,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            default_locale: Locale::root(),
        }
    }
}
