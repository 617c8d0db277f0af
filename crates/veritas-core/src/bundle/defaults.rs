//! Built-in default messages for the standard constraints
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use super::ResourceBundle;
use std::sync::{Arc, OnceLock};

static DEFAULT_BUNDLE: OnceLock<Arc<ResourceBundle>> = OnceLock::new();

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("validator.assertFalse", "assertion failed"),
    ("validator.assertTrue", "assertion failed"),
    ("validator.digits", "numeric value out of bounds (<{integer} digits>.<{fraction} digits> expected)"),
    ("validator.email", "not a well-formed email address"),
    ("validator.future", "must be in the future"),
    ("validator.length", "length must be between {min} and {max}"),
    ("validator.max", "must be less than or equal to {value}"),
    ("validator.min", "must be greater than or equal to {value}"),
    ("validator.notEmpty", "may not be empty"),
    ("validator.notNull", "may not be null"),
    ("validator.null", "must be null"),
    ("validator.past", "must be in the past"),
    ("validator.pattern", "must match \"{regexp}\""),
    ("validator.range", "must be between {min} and {max}"),
    ("validator.size", "size must be between {min} and {max}"),
];

/// The bundle consulted after the caller-supplied one
pub fn default_bundle() -> Arc<ResourceBundle> {
    Arc::clone(DEFAULT_BUNDLE.get_or_init(|| {
        Arc::new(DEFAULT_MESSAGES.iter().copied().collect())
    }))
}
