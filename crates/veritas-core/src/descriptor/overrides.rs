//! Override parameters collected from a constraint's attributes
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use crate::metadata::OverrideDirective;
use crate::types::{ConstraintKind, Parameters};
use serde_json::Value;
use std::collections::HashMap;

/// Target of an override: a composing constraint kind at an occurrence index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideTarget {
    pub kind: ConstraintKind,
    pub index: i32,
}

impl OverrideTarget {
    pub fn new(kind: ConstraintKind, index: i32) -> Self {
        Self { kind, index }
    }
}

/// `(kind, index) -> (parameter -> value)`, alive only while one descriptor is built
#[derive(Debug, Clone, Default)]
pub struct OverrideParameterMap {
    entries: HashMap<OverrideTarget, Parameters>,
}

impl OverrideParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for every directive; the last write for a
    /// `(kind, index, parameter)` triple wins
    pub fn record(&mut self, directives: &[OverrideDirective], value: &Value) {
        for directive in directives {
            self.entries
                .entry(OverrideTarget::new(directive.constraint.clone(), directive.index))
                .or_default()
                .insert(directive.parameter.clone(), value.clone());
        }
    }

    pub fn get(&self, kind: &ConstraintKind, index: i32) -> Option<&Parameters> {
        self.entries.get(&OverrideTarget::new(kind.clone(), index))
    }

    /// Replace entries of `parameters` with the overrides recorded for the
    /// target; names the target does not define are inserted as well
    pub fn apply(&self, kind: &ConstraintKind, index: i32, parameters: &mut Parameters) {
        if let Some(overrides) = self.get(kind, index) {
            for (name, value) in overrides {
                parameters.insert(name.clone(), value.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
