//! Constraint metadata: the collaborators the descriptor builder reads from
//!
//! The builder never inspects declarations directly. Everything it needs about
//! a constraint kind (attribute values, override directives, meta-declarations,
//! validator implementations) is answered by two traits:
//!
//! - [`DeclarationIntrospector`]: attributes and meta-declarations of a kind
//! - [`ValidatorRegistry`]: validator implementations of builtin kinds
//!
//! [`MetadataRegistry`] is the explicit metadata table implementing the
//! introspector, and [`BuiltinValidators`] the default validator registry.
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

pub mod builtin;
pub mod registry;

pub use builtin::BuiltinValidators;
pub use registry::{ConstraintDefinition, MetadataRegistry, MetadataRegistryBuilder};

use crate::error::IntrospectionError;
use crate::types::{ConstraintDeclaration, ConstraintKind, Parameters, ValidatorId};
use serde_json::Value;
use std::slice;

/// Occurrence index of an override targeting a single, non-list composing constraint
pub const DEFAULT_OVERRIDE_INDEX: i32 = -1;

/// Directive on an attribute: its value replaces `parameter` of the composing
/// constraint `constraint` found at occurrence `index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideDirective {
    pub constraint: ConstraintKind,
    pub parameter: String,
    pub index: i32,
}

impl OverrideDirective {
    /// Directive targeting the single occurrence of `constraint`
    pub fn new<K: Into<ConstraintKind>, P: Into<String>>(constraint: K, parameter: P) -> Self {
        Self {
            constraint: constraint.into(),
            parameter: parameter.into(),
            index: DEFAULT_OVERRIDE_INDEX,
        }
    }

    /// Target the `index`-th (1-based) element of a multi-valued composing list
    pub fn at_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }
}

/// Override directives attached to one attribute: a single one or a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverridesParameter {
    Single(OverrideDirective),
    List(Vec<OverrideDirective>),
}

impl OverridesParameter {
    pub fn directives(&self) -> &[OverrideDirective] {
        match self {
            OverridesParameter::Single(directive) => slice::from_ref(directive),
            OverridesParameter::List(directives) => directives,
        }
    }
}

/// An attribute a constraint kind defines
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeAccessor {
    pub name: String,
    /// Value used when a declaration does not set the attribute
    pub default: Option<Value>,
    pub overrides: Option<OverridesParameter>,
}

impl AttributeAccessor {
    pub fn new<N: Into<String>>(name: N, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            default,
            overrides: None,
        }
    }

    pub fn overriding(mut self, overrides: OverridesParameter) -> Self {
        self.overrides = Some(overrides);
        self
    }
}

/// A declaration attached to a constraint kind itself
#[derive(Debug, Clone, PartialEq)]
pub enum MetaDeclaration {
    /// A nested declaration; composing when its kind is a constraint kind
    Declaration(ConstraintDeclaration),
    /// An umbrella holding an ordered list of declarations of one kind
    MultiValued {
        umbrella: ConstraintKind,
        members: Vec<ConstraintDeclaration>,
    },
    /// Explicit validator implementations of a non-builtin kind
    ValidatedBy(Vec<ValidatorId>),
    /// Violations of composing constraints are reported as one violation
    ReportAsSingleViolation,
}

/// Supplies attribute maps and meta-declarations of constraint kinds
pub trait DeclarationIntrospector: Send + Sync {
    /// All named attribute values of a declaration, defaults included
    fn attributes_of(
        &self,
        declaration: &ConstraintDeclaration,
    ) -> Result<Parameters, IntrospectionError>;

    /// Attribute definitions of a kind, in declaration order
    fn attribute_accessors(&self, kind: &ConstraintKind) -> Vec<AttributeAccessor>;

    /// Meta-declarations attached to a kind, in declaration order
    fn meta_declarations_of(&self, kind: &ConstraintKind) -> Vec<MetaDeclaration>;

    fn is_builtin_kind(&self, kind: &ConstraintKind) -> bool;

    /// Whether a nested declaration is itself a constraint
    fn is_composing_kind(&self, declaration: &ConstraintDeclaration) -> bool;

    /// Constraint elements of a multi-valued meta-declaration; empty otherwise
    fn expand_multi_valued(&self, meta: &MetaDeclaration) -> Vec<ConstraintDeclaration>;
}

/// Maps builtin constraint kinds to their validator implementations
pub trait ValidatorRegistry: Send + Sync {
    fn implementations_for(&self, kind: &ConstraintKind) -> Vec<ValidatorId>;
}
