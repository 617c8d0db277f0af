//! Immutable constraint descriptors and the builder producing them
//!
//! A [`ConstraintDescriptor`] is the resolved form of one constraint
//! occurrence: its validators, groups, parameters and, recursively, the
//! descriptors of its composing constraints. Descriptors are built once by a
//! [`DescriptorBuilder`] and never change afterwards.
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod overrides;

pub use builder::DescriptorBuilder;
pub use overrides::{OverrideParameterMap, OverrideTarget};

use crate::types::{ConstraintDeclaration, ConstraintKind, Group, Parameters, ValidatorId};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Resolved metadata of a single constraint occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDescriptor {
    pub(crate) declaration: ConstraintDeclaration,
    pub(crate) validator_implementations: Vec<ValidatorId>,
    pub(crate) groups: BTreeSet<Group>,
    pub(crate) parameters: Parameters,
    pub(crate) composing_constraints: Vec<ConstraintDescriptor>,
    pub(crate) report_as_single_violation: bool,
}

impl ConstraintDescriptor {
    pub fn kind(&self) -> &ConstraintKind {
        &self.declaration.kind
    }

    /// The declaration this descriptor was built from, overrides applied
    pub fn declaration(&self) -> &ConstraintDeclaration {
        &self.declaration
    }

    pub fn validator_implementations(&self) -> &[ValidatorId] {
        &self.validator_implementations
    }

    /// Groups this constraint belongs to; never empty
    pub fn groups(&self) -> &BTreeSet<Group> {
        &self.groups
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Descriptors of the composing constraints, in discovery order
    pub fn composing_constraints(&self) -> &[ConstraintDescriptor] {
        &self.composing_constraints
    }

    pub fn is_report_as_single_violation(&self) -> bool {
        self.report_as_single_violation
    }

    /// The unexpanded message template, taken from the `message` parameter
    pub fn message_template(&self) -> Option<&str> {
        self.parameters.get("message").and_then(Value::as_str)
    }

    pub fn is_composed(&self) -> bool {
        !self.composing_constraints.is_empty()
    }
}

impl fmt::Display for ConstraintDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validators: Vec<&str> = self
            .validator_implementations
            .iter()
            .map(ValidatorId::as_str)
            .collect();
        let groups: Vec<&str> = self.groups.iter().map(Group::as_str).collect();
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        write!(
            f,
            "ConstraintDescriptor{{kind={}, validators=[{}], groups=[{}], parameters={{{}}}, reportAsSingleViolation={}, composingConstraints=[",
            self.kind(),
            validators.join(", "),
            groups.join(", "),
            parameters.join(", "),
            self.report_as_single_violation,
        )?;
        for (i, composing) in self.composing_constraints.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", composing)?;
        }
        f.write_str("]}")
    }
}
