//! Builtin constraint kinds and their validator implementations
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use super::registry::ConstraintDefinition;
use super::ValidatorRegistry;
use crate::types::{ConstraintKind, ValidatorId};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Validator implementations of the builtin kinds
#[derive(Debug, Clone, Default)]
pub struct BuiltinValidators {
    validators: HashMap<ConstraintKind, Vec<ValidatorId>>,
}

impl BuiltinValidators {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard implementations for every standard builtin kind
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (kind, validators) in STANDARD_VALIDATORS {
            registry.register(*kind, validators.iter().copied());
        }
        registry
    }

    /// Register implementations for a kind, appending to any already present
    pub fn register<K, I, V>(&mut self, kind: K, validators: I)
    where
        K: Into<ConstraintKind>,
        I: IntoIterator<Item = V>,
        V: Into<ValidatorId>,
    {
        self.validators
            .entry(kind.into())
            .or_default()
            .extend(validators.into_iter().map(Into::into));
    }
}

impl ValidatorRegistry for BuiltinValidators {
    fn implementations_for(&self, kind: &ConstraintKind) -> Vec<ValidatorId> {
        self.validators.get(kind).cloned().unwrap_or_default()
    }
}

const STANDARD_VALIDATORS: &[(&str, &[&str])] = &[
    ("NotNull", &["NotNullValidator"]),
    ("Null", &["NullValidator"]),
    ("AssertTrue", &["AssertTrueValidator"]),
    ("AssertFalse", &["AssertFalseValidator"]),
    ("Min", &["MinValidatorForNumber", "MinValidatorForString"]),
    ("Max", &["MaxValidatorForNumber", "MaxValidatorForString"]),
    (
        "Size",
        &[
            "SizeValidatorForString",
            "SizeValidatorForCollection",
            "SizeValidatorForArray",
            "SizeValidatorForMap",
        ],
    ),
    ("Digits", &["DigitsValidatorForNumber", "DigitsValidatorForString"]),
    ("Past", &["PastValidatorForDate", "PastValidatorForCalendar"]),
    ("Future", &["FutureValidatorForDate", "FutureValidatorForCalendar"]),
    ("Pattern", &["PatternValidator"]),
];

/// Definitions of the standard builtin kinds, each defaulting its message to
/// the matching entry of the default bundle
pub fn standard_definitions() -> Vec<ConstraintDefinition> {
    let bounded = |kind: &str, key: &str, name: &str| {
        ConstraintDefinition::standard(kind, format!("{{validator.{key}}}"))
            .required_attribute(name)
    };

    vec![
        ConstraintDefinition::standard("NotNull", "{validator.notNull}"),
        ConstraintDefinition::standard("Null", "{validator.null}"),
        ConstraintDefinition::standard("AssertTrue", "{validator.assertTrue}"),
        ConstraintDefinition::standard("AssertFalse", "{validator.assertFalse}"),
        bounded("Min", "min", "value"),
        bounded("Max", "max", "value"),
        ConstraintDefinition::standard("Size", "{validator.size}")
            .attribute("min", json!(0))
            .attribute("max", json!(i32::MAX)),
        ConstraintDefinition::standard("Digits", "{validator.digits}")
            .required_attribute("integer")
            .required_attribute("fraction"),
        ConstraintDefinition::standard("Past", "{validator.past}"),
        ConstraintDefinition::standard("Future", "{validator.future}"),
        bounded("Pattern", "pattern", "regexp").attribute("flags", Value::Array(Vec::new())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_validators() {
        let registry = BuiltinValidators::standard();
        let size = registry.implementations_for(&ConstraintKind::new("Size"));
        assert_eq!(size.len(), 4);
        assert_eq!(size[0].as_str(), "SizeValidatorForString");
        assert!(registry
            .implementations_for(&ConstraintKind::new("Length"))
            .is_empty());
    }

    #[test]
    fn test_every_standard_definition_has_validators() {
        let registry = BuiltinValidators::standard();
        for definition in standard_definitions() {
            assert!(
                !registry.implementations_for(&definition.kind).is_empty(),
                "no validators for {}",
                definition.kind
            );
        }
    }

    #[test]
    fn test_register_appends() {
        let mut registry = BuiltinValidators::standard();
        registry.register("NotNull", ["NotNullValidatorForOptional"]);
        let ids: Vec<String> = registry
            .implementations_for(&ConstraintKind::new("NotNull"))
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(ids, vec!["NotNullValidator", "NotNullValidatorForOptional"]);
    }
}
