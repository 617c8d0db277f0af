//! Construction of constraint descriptors from declarations
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use super::overrides::OverrideParameterMap;
use super::ConstraintDescriptor;
use crate::error::{Error, Result};
use crate::metadata::{
    DeclarationIntrospector, MetaDeclaration, ValidatorRegistry, DEFAULT_OVERRIDE_INDEX,
};
use crate::types::{ConstraintDeclaration, ConstraintKind, Group, Parameters, ValidatorId};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Builds [`ConstraintDescriptor`] trees
///
/// The builder only reads from its collaborators, so one builder can serve
/// any number of threads building descriptors for independent declarations.
/// Composing constraints are built sequentially within one call since their
/// discovery order determines the override indices.
pub struct DescriptorBuilder<'a> {
    introspector: &'a dyn DeclarationIntrospector,
    validators: &'a dyn ValidatorRegistry,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(
        introspector: &'a dyn DeclarationIntrospector,
        validators: &'a dyn ValidatorRegistry,
    ) -> Self {
        Self {
            introspector,
            validators,
        }
    }

    /// Build the descriptor of `declaration`
    ///
    /// An empty `explicit_groups` puts the constraint in the `Default` group.
    /// Fails with [`Error::Configuration`] when the attributes of the
    /// declaration, or of any composing declaration, cannot be read.
    pub fn build(
        &self,
        declaration: &ConstraintDeclaration,
        explicit_groups: &[Group],
    ) -> Result<ConstraintDescriptor> {
        let groups: BTreeSet<Group> = if explicit_groups.is_empty() {
            BTreeSet::from([Group::default_group()])
        } else {
            explicit_groups.iter().cloned().collect()
        };

        let parameters = self.extract_parameters(declaration)?;
        self.assemble(declaration.clone(), parameters, groups)
    }

    /// Build using the groups listed on the declaration itself
    pub fn build_declared(&self, declaration: &ConstraintDeclaration) -> Result<ConstraintDescriptor> {
        self.build(declaration, &declaration.groups)
    }

    fn extract_parameters(&self, declaration: &ConstraintDeclaration) -> Result<Parameters> {
        self.introspector
            .attributes_of(declaration)
            .map_err(|e| Error::configuration(declaration.kind.clone(), e))
    }

    fn assemble(
        &self,
        declaration: ConstraintDeclaration,
        parameters: Parameters,
        groups: BTreeSet<Group>,
    ) -> Result<ConstraintDescriptor> {
        let kind = &declaration.kind;
        let meta = self.introspector.meta_declarations_of(kind);

        let validator_implementations = self.find_validators(kind, &meta);
        let report_as_single_violation = meta
            .iter()
            .any(|m| matches!(m, MetaDeclaration::ReportAsSingleViolation));
        let overrides = self.parse_override_parameters(kind, &parameters);
        if !overrides.is_empty() {
            debug!(kind = %kind, targets = overrides.len(), "Recorded override parameters");
        }
        let composing_constraints = self.parse_composing_constraints(kind, &meta, &overrides, &groups)?;

        Ok(ConstraintDescriptor {
            declaration,
            validator_implementations,
            groups,
            parameters,
            composing_constraints,
            report_as_single_violation,
        })
    }

    fn find_validators(&self, kind: &ConstraintKind, meta: &[MetaDeclaration]) -> Vec<ValidatorId> {
        if self.introspector.is_builtin_kind(kind) {
            return self.validators.implementations_for(kind);
        }

        let validated_by = meta.iter().find_map(|m| match m {
            MetaDeclaration::ValidatedBy(validators) => Some(validators.clone()),
            _ => None,
        });
        validated_by.unwrap_or_else(|| {
            warn!(kind = %kind, "Constraint kind declares no validator implementations");
            Vec::new()
        })
    }

    fn parse_override_parameters(
        &self,
        kind: &ConstraintKind,
        parameters: &Parameters,
    ) -> OverrideParameterMap {
        let mut overrides = OverrideParameterMap::new();
        for accessor in self.introspector.attribute_accessors(kind) {
            let (Some(directives), Some(value)) = (&accessor.overrides, parameters.get(&accessor.name))
            else {
                continue;
            };
            overrides.record(directives.directives(), value);
        }
        overrides
    }

    fn parse_composing_constraints(
        &self,
        kind: &ConstraintKind,
        meta: &[MetaDeclaration],
        overrides: &OverrideParameterMap,
        groups: &BTreeSet<Group>,
    ) -> Result<Vec<ConstraintDescriptor>> {
        let mut composing = Vec::new();

        for declared in meta {
            match declared {
                MetaDeclaration::Declaration(nested) if self.introspector.is_composing_kind(nested) => {
                    let descriptor =
                        self.composing_descriptor(nested, DEFAULT_OVERRIDE_INDEX, overrides, groups)?;
                    debug!(parent = %kind, composing = %descriptor.kind(), "Adding composing constraint");
                    composing.push(descriptor);
                }
                MetaDeclaration::MultiValued { .. } => {
                    let members = self.introspector.expand_multi_valued(declared);
                    for (index, member) in (1..).zip(members.iter()) {
                        let descriptor = self.composing_descriptor(member, index, overrides, groups)?;
                        debug!(
                            parent = %kind,
                            composing = %descriptor.kind(),
                            index,
                            "Adding composing constraint"
                        );
                        composing.push(descriptor);
                    }
                }
                _ => {}
            }
        }

        Ok(composing)
    }

    fn composing_descriptor(
        &self,
        declaration: &ConstraintDeclaration,
        index: i32,
        overrides: &OverrideParameterMap,
        groups: &BTreeSet<Group>,
    ) -> Result<ConstraintDescriptor> {
        let mut parameters = self.extract_parameters(declaration)?;
        overrides.apply(&declaration.kind, index, &mut parameters);

        let effective = match overrides.get(&declaration.kind, index) {
            Some(replaced) => declaration.with_overrides(replaced),
            None => declaration.clone(),
        };
        self.assemble(effective, parameters, groups.clone())
    }
}
