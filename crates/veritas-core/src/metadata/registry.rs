//! Explicit metadata table describing constraint kinds
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use super::{AttributeAccessor, DeclarationIntrospector, MetaDeclaration, OverridesParameter};
use crate::error::IntrospectionError;
use crate::types::{ConstraintDeclaration, ConstraintKind, Parameters, ValidatorId};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Everything known about one constraint kind
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDefinition {
    pub kind: ConstraintKind,
    pub attributes: Vec<AttributeAccessor>,
    pub meta: Vec<MetaDeclaration>,
}

impl ConstraintDefinition {
    /// Definition with no attributes and no meta-declarations
    pub fn new<K: Into<ConstraintKind>>(kind: K) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
            meta: Vec::new(),
        }
    }

    /// Definition carrying the `message` and `groups` attributes every
    /// constraint has, with `message` defaulting to `message_template`
    pub fn standard<K: Into<ConstraintKind>, M: Into<String>>(kind: K, message_template: M) -> Self {
        Self::new(kind)
            .attribute("message", Value::String(message_template.into()))
            .attribute("groups", Value::Array(Vec::new()))
    }

    /// Attribute with a default value
    pub fn attribute<N: Into<String>>(mut self, name: N, default: Value) -> Self {
        self.attributes.push(AttributeAccessor::new(name, Some(default)));
        self
    }

    /// Attribute every declaration must set
    pub fn required_attribute<N: Into<String>>(mut self, name: N) -> Self {
        self.attributes.push(AttributeAccessor::new(name, None));
        self
    }

    /// Attribute whose value overrides parameters of composing constraints
    pub fn overriding_attribute<N: Into<String>>(
        mut self,
        name: N,
        default: Option<Value>,
        overrides: OverridesParameter,
    ) -> Self {
        self.attributes
            .push(AttributeAccessor::new(name, default).overriding(overrides));
        self
    }

    pub fn validated_by<I, V>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ValidatorId>,
    {
        self.meta.push(MetaDeclaration::ValidatedBy(
            validators.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn report_as_single_violation(mut self) -> Self {
        self.meta.push(MetaDeclaration::ReportAsSingleViolation);
        self
    }

    /// Attach a nested declaration
    pub fn composed_of(mut self, declaration: ConstraintDeclaration) -> Self {
        self.meta.push(MetaDeclaration::Declaration(declaration));
        self
    }

    /// Attach a multi-valued umbrella holding `members` in order
    pub fn composed_of_list<K: Into<ConstraintKind>>(
        mut self,
        umbrella: K,
        members: Vec<ConstraintDeclaration>,
    ) -> Self {
        self.meta.push(MetaDeclaration::MultiValued {
            umbrella: umbrella.into(),
            members,
        });
        self
    }

    fn accessor(&self, name: &str) -> Option<&AttributeAccessor> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Table of constraint definitions answering introspection queries
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    definitions: HashMap<ConstraintKind, ConstraintDefinition>,
    builtins: HashSet<ConstraintKind>,
}

impl MetadataRegistry {
    pub fn builder() -> MetadataRegistryBuilder {
        MetadataRegistryBuilder::default()
    }

    /// Registry holding the standard builtin constraint kinds
    pub fn with_builtins() -> Self {
        Self::builder().standard_builtins().build()
    }

    pub fn definition(&self, kind: &ConstraintKind) -> Option<&ConstraintDefinition> {
        self.definitions.get(kind)
    }

    pub fn contains(&self, kind: &ConstraintKind) -> bool {
        self.definitions.contains_key(kind)
    }

    /// Registered kinds in name order
    pub fn kinds(&self) -> Vec<&ConstraintKind> {
        let mut kinds: Vec<_> = self.definitions.keys().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn lookup(&self, kind: &ConstraintKind) -> Result<&ConstraintDefinition, IntrospectionError> {
        self.definitions
            .get(kind)
            .ok_or_else(|| IntrospectionError::UnknownKind { kind: kind.clone() })
    }
}

impl DeclarationIntrospector for MetadataRegistry {
    fn attributes_of(
        &self,
        declaration: &ConstraintDeclaration,
    ) -> Result<Parameters, IntrospectionError> {
        let definition = self.lookup(&declaration.kind)?;

        if let Some(unknown) = declaration
            .attributes
            .keys()
            .find(|name| definition.accessor(name).is_none())
        {
            return Err(IntrospectionError::UnknownAttribute {
                kind: declaration.kind.clone(),
                attribute: unknown.clone(),
            });
        }

        let mut parameters = Parameters::new();
        for accessor in &definition.attributes {
            let value = declaration
                .attribute(&accessor.name)
                .or(accessor.default.as_ref())
                .ok_or_else(|| IntrospectionError::MissingAttribute {
                    kind: declaration.kind.clone(),
                    attribute: accessor.name.clone(),
                })?;
            parameters.insert(accessor.name.clone(), value.clone());
        }
        Ok(parameters)
    }

    fn attribute_accessors(&self, kind: &ConstraintKind) -> Vec<AttributeAccessor> {
        self.definitions
            .get(kind)
            .map(|d| d.attributes.clone())
            .unwrap_or_default()
    }

    fn meta_declarations_of(&self, kind: &ConstraintKind) -> Vec<MetaDeclaration> {
        self.definitions
            .get(kind)
            .map(|d| d.meta.clone())
            .unwrap_or_default()
    }

    fn is_builtin_kind(&self, kind: &ConstraintKind) -> bool {
        self.builtins.contains(kind)
    }

    fn is_composing_kind(&self, declaration: &ConstraintDeclaration) -> bool {
        self.definitions.contains_key(&declaration.kind) || self.builtins.contains(&declaration.kind)
    }

    fn expand_multi_valued(&self, meta: &MetaDeclaration) -> Vec<ConstraintDeclaration> {
        match meta {
            MetaDeclaration::MultiValued { members, .. } => members
                .iter()
                .filter(|member| self.is_composing_kind(member))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Builder populating a [`MetadataRegistry`] at startup
#[derive(Debug, Default)]
pub struct MetadataRegistryBuilder {
    registry: MetadataRegistry,
}

impl MetadataRegistryBuilder {
    /// Register a user-defined constraint kind; a later definition of the
    /// same kind replaces the earlier one
    pub fn constraint(mut self, definition: ConstraintDefinition) -> Self {
        self.registry.builtins.remove(&definition.kind);
        self.registry
            .definitions
            .insert(definition.kind.clone(), definition);
        self
    }

    /// Register a builtin kind, whose validators come from the validator registry
    pub fn builtin(mut self, definition: ConstraintDefinition) -> Self {
        self.registry.builtins.insert(definition.kind.clone());
        self.registry
            .definitions
            .insert(definition.kind.clone(), definition);
        self
    }

    pub fn standard_builtins(self) -> Self {
        super::builtin::standard_definitions()
            .into_iter()
            .fold(self, |builder, definition| builder.builtin(definition))
    }

    pub fn build(self) -> MetadataRegistry {
        self.registry
    }
}
