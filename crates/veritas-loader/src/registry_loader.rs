//! Metadata documents describing constraint kinds
//!
//! A document lists user-defined constraint kinds and whether the standard
//! builtin kinds are registered alongside them:
//!
//! ```yaml
//! builtins: true
//! constraints:
//!   - kind: PostalCode
//!     message: "invalid postal code"
//!     attributes:
//!       - name: maxLength
//!         default: 10
//!         overrides:
//!           - { constraint: Size, parameter: max, index: 2 }
//!     validated_by: [PostalCodeValidator]
//!     report_as_single_violation: true
//!     composed_of:
//!       - kind: NotNull
//!       - list: Size.List
//!         members:
//!           - { kind: Size, attributes: { max: 10 } }
//!           - { kind: Size, attributes: { max: 10 } }
//! ```
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use crate::error::{LoaderError, LoaderResult};
use crate::parser::{DocumentParser, Format};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;
use veritas_core::metadata::builtin::standard_definitions;
use veritas_core::metadata::DEFAULT_OVERRIDE_INDEX;
use veritas_core::{
    ConstraintDeclaration, ConstraintDefinition, MetadataRegistry, OverrideDirective,
    OverridesParameter,
};

/// Root of a metadata document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataDocument {
    /// Register the standard builtin kinds
    #[serde(default = "default_true")]
    pub builtins: bool,

    #[serde(default)]
    pub constraints: Vec<ConstraintDocument>,
}

/// One user-defined constraint kind
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintDocument {
    pub kind: String,

    /// Default message template
    pub message: String,

    #[serde(default)]
    pub attributes: Vec<AttributeDocument>,

    #[serde(default)]
    pub validated_by: Vec<String>,

    #[serde(default)]
    pub report_as_single_violation: bool,

    #[serde(default)]
    pub composed_of: Vec<ComposingDocument>,
}

/// An attribute; without a default it is required on every declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDocument {
    pub name: String,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(default)]
    pub overrides: Vec<OverrideDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideDocument {
    pub constraint: String,
    pub parameter: String,
    #[serde(default = "default_index")]
    pub index: i32,
}

/// A composing declaration, or a multi-valued umbrella of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComposingDocument {
    List {
        list: String,
        members: Vec<ConstraintDeclaration>,
    },
    Single(ConstraintDeclaration),
}

fn default_true() -> bool {
    true
}

fn default_index() -> i32 {
    DEFAULT_OVERRIDE_INDEX
}

/// Loads [`MetadataRegistry`] tables from YAML or JSON documents
#[derive(Debug, Default)]
pub struct RegistryLoader {
    parser: DocumentParser,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a metadata document, detecting format from extension
    pub fn load_file(&self, path: &Path) -> LoaderResult<MetadataRegistry> {
        let format = Format::from_path(path)?;
        if !format.is_structured() {
            return Err(LoaderError::unsupported_format(path.to_path_buf()));
        }
        let value = self.parser.parse_file(path)?;
        self.load_value(value, path)
    }

    /// Load a metadata document from a string
    pub fn load_str(&self, content: &str, format: Format) -> LoaderResult<MetadataRegistry> {
        let path = PathBuf::from("<inline>");
        if !format.is_structured() {
            return Err(LoaderError::unsupported_format(path));
        }
        let value = self.parser.parse_content(content, format, &path)?;
        self.load_value(value, &path)
    }

    fn load_value(&self, value: Value, path: &Path) -> LoaderResult<MetadataRegistry> {
        let document: MetadataDocument = serde_json::from_value(value)
            .map_err(|e| LoaderError::invalid_document(path.to_path_buf(), e.to_string()))?;
        document.into_registry(path)
    }
}

impl MetadataDocument {
    /// Validate the document and build the registry it describes
    pub fn into_registry(self, path: &Path) -> LoaderResult<MetadataRegistry> {
        self.validate(path)?;

        let mut builder = MetadataRegistry::builder();
        if self.builtins {
            builder = builder.standard_builtins();
        }
        for constraint in self.constraints {
            debug!(kind = %constraint.kind, path = %path.display(), "Registering constraint kind");
            builder = builder.constraint(constraint.into_definition());
        }
        Ok(builder.build())
    }

    fn validate(&self, path: &Path) -> LoaderResult<()> {
        let invalid = |reason: String| LoaderError::invalid_document(path.to_path_buf(), reason);

        let mut kinds = HashSet::new();
        for constraint in &self.constraints {
            if !kinds.insert(constraint.kind.as_str()) {
                return Err(invalid(format!("duplicate constraint kind '{}'", constraint.kind)));
            }
            if constraint.validated_by.is_empty() {
                return Err(invalid(format!(
                    "constraint kind '{}' declares no validators",
                    constraint.kind
                )));
            }

            let mut names = HashSet::new();
            for attribute in &constraint.attributes {
                if matches!(attribute.name.as_str(), "message" | "groups") {
                    return Err(invalid(format!(
                        "attribute '{}' of '{}' is reserved",
                        attribute.name, constraint.kind
                    )));
                }
                if !names.insert(attribute.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate attribute '{}' on '{}'",
                        attribute.name, constraint.kind
                    )));
                }
                if let Some(directive) = attribute
                    .overrides
                    .iter()
                    .find(|o| o.index != DEFAULT_OVERRIDE_INDEX && o.index < 1)
                {
                    return Err(invalid(format!(
                        "override of '{}.{}' on '{}' has index {}; expected -1 or a 1-based position",
                        directive.constraint, directive.parameter, constraint.kind, directive.index
                    )));
                }
            }
        }

        let builtins: HashSet<String> = if self.builtins {
            standard_definitions()
                .into_iter()
                .map(|definition| definition.kind.as_str().to_string())
                .collect()
        } else {
            HashSet::new()
        };
        for constraint in &self.constraints {
            if let Some(unknown) = constraint
                .composing_kinds()
                .find(|kind| !kinds.contains(kind) && !builtins.contains(*kind))
            {
                return Err(invalid(format!(
                    "constraint kind '{}' is composed of unknown kind '{}'",
                    constraint.kind, unknown
                )));
            }
        }

        self.check_acyclic().map_err(invalid)
    }

    /// Composition among the document's kinds must not loop back on itself
    fn check_acyclic(&self) -> Result<(), String> {
        let edges: HashMap<&str, Vec<&str>> = self
            .constraints
            .iter()
            .map(|c| (c.kind.as_str(), c.composing_kinds().collect()))
            .collect();

        fn visit<'a>(
            kind: &'a str,
            edges: &HashMap<&'a str, Vec<&'a str>>,
            path: &mut Vec<&'a str>,
            done: &mut HashSet<&'a str>,
        ) -> Result<(), String> {
            if done.contains(kind) {
                return Ok(());
            }
            if let Some(start) = path.iter().position(|k| *k == kind) {
                let mut chain = path[start..].to_vec();
                chain.push(kind);
                return Err(format!("composition cycle {}", chain.join(" -> ")));
            }

            path.push(kind);
            for &next in edges.get(kind).into_iter().flatten() {
                visit(next, edges, path, done)?;
            }
            path.pop();
            done.insert(kind);
            Ok(())
        }

        let mut done = HashSet::new();
        for constraint in &self.constraints {
            visit(&constraint.kind, &edges, &mut Vec::new(), &mut done)?;
        }
        Ok(())
    }
}

impl ConstraintDocument {
    fn composing_kinds(&self) -> impl Iterator<Item = &str> {
        self.composed_of.iter().flat_map(|composing| {
            let declarations: Vec<&ConstraintDeclaration> = match composing {
                ComposingDocument::List { members, .. } => members.iter().collect(),
                ComposingDocument::Single(declaration) => vec![declaration],
            };
            declarations.into_iter().map(|d| d.kind.as_str())
        })
    }

    fn into_definition(self) -> ConstraintDefinition {
        let mut definition = ConstraintDefinition::standard(self.kind, self.message);

        for attribute in self.attributes {
            let mut directives: Vec<OverrideDirective> = attribute
                .overrides
                .into_iter()
                .map(|o| OverrideDirective::new(o.constraint, o.parameter).at_index(o.index))
                .collect();

            definition = match (directives.len(), attribute.default) {
                (0, Some(default)) => definition.attribute(attribute.name, default),
                (0, None) => definition.required_attribute(attribute.name),
                (1, default) => definition.overriding_attribute(
                    attribute.name,
                    default,
                    OverridesParameter::Single(directives.remove(0)),
                ),
                (_, default) => definition.overriding_attribute(
                    attribute.name,
                    default,
                    OverridesParameter::List(directives),
                ),
            };
        }

        definition = definition.validated_by(self.validated_by);
        if self.report_as_single_violation {
            definition = definition.report_as_single_violation();
        }

        for composing in self.composed_of {
            definition = match composing {
                ComposingDocument::List { list, members } => definition.composed_of_list(list, members),
                ComposingDocument::Single(declaration) => definition.composed_of(declaration),
            };
        }

        definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veritas_core::{ConstraintKind, DeclarationIntrospector, MetaDeclaration};

    const POSTAL_CODE: &str = r#"
constraints:
  - kind: PostalCode
    message: "invalid postal code"
    attributes:
      - name: country
      - name: maxLength
        default: 10
        overrides:
          - { constraint: Size, parameter: max, index: 2 }
    validated_by: [PostalCodeValidator]
    report_as_single_violation: true
    composed_of:
      - kind: NotNull
      - list: Size.List
        members:
          - { kind: Size, attributes: { max: 10 } }
          - { kind: Size, attributes: { max: 10 } }
"#;

    #[test]
    fn test_load_yaml_document() {
        let registry = RegistryLoader::new().load_str(POSTAL_CODE, Format::Yaml).unwrap();
        let postal = ConstraintKind::new("PostalCode");

        assert!(registry.contains(&postal));
        assert!(registry.contains(&ConstraintKind::new("Size")));
        assert!(!registry.is_builtin_kind(&postal));
        assert!(registry.is_builtin_kind(&ConstraintKind::new("Size")));

        let meta = registry.meta_declarations_of(&postal);
        assert_eq!(meta.len(), 4);
        assert!(meta.contains(&MetaDeclaration::ReportAsSingleViolation));
        assert!(matches!(
            &meta[2],
            MetaDeclaration::Declaration(d) if d.kind.as_str() == "NotNull"
        ));
        assert!(matches!(
            &meta[3],
            MetaDeclaration::MultiValued { umbrella, members }
                if umbrella.as_str() == "Size.List" && members.len() == 2
        ));

        let accessors = registry.attribute_accessors(&postal);
        let max_length = accessors.iter().find(|a| a.name == "maxLength").unwrap();
        assert_eq!(max_length.default, Some(json!(10)));
        assert!(matches!(
            &max_length.overrides,
            Some(OverridesParameter::Single(d)) if d.index == 2 && d.parameter == "max"
        ));
        let country = accessors.iter().find(|a| a.name == "country").unwrap();
        assert_eq!(country.default, None);
    }

    #[test]
    fn test_builtins_can_be_disabled() {
        let registry = RegistryLoader::new()
            .load_str(
                r#"{"builtins": false, "constraints": [{"kind": "Flag", "message": "bad flag", "validated_by": ["FlagValidator"]}]}"#,
                Format::Json,
            )
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains(&ConstraintKind::new("NotNull")));
    }

    #[test]
    fn test_override_lists() {
        let registry = RegistryLoader::new()
            .load_str(
                r#"
builtins: true
constraints:
  - kind: Range
    message: out of range
    attributes:
      - name: bound
        overrides:
          - { constraint: Min, parameter: value }
          - { constraint: Max, parameter: value }
    validated_by: [RangeValidator]
    composed_of:
      - { kind: Min, attributes: { value: 0 } }
      - { kind: Max, attributes: { value: 0 } }
"#,
                Format::Yaml,
            )
            .unwrap();

        let accessors = registry.attribute_accessors(&ConstraintKind::new("Range"));
        let bound = accessors.iter().find(|a| a.name == "bound").unwrap();
        match &bound.overrides {
            Some(OverridesParameter::List(directives)) => {
                assert_eq!(directives.len(), 2);
                assert!(directives.iter().all(|d| d.index == DEFAULT_OVERRIDE_INDEX));
            }
            other => panic!("expected override list, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_documents() {
        let loader = RegistryLoader::new();
        let cases = [
            (
                "constraints:\n  - { kind: A, message: a, validated_by: [V] }\n  - { kind: A, message: b, validated_by: [V] }\n",
                "duplicate constraint kind",
            ),
            ("constraints:\n  - { kind: A, message: a }\n", "declares no validators"),
            (
                "constraints:\n  - kind: A\n    message: a\n    validated_by: [V]\n    attributes: [{ name: message }]\n",
                "reserved",
            ),
            (
                "constraints:\n  - kind: A\n    message: a\n    validated_by: [V]\n    attributes:\n      - name: x\n        overrides: [{ constraint: Size, parameter: max, index: 0 }]\n",
                "expected -1 or a 1-based position",
            ),
            ("constraints:\n  - { kind: A, validated_by: [V] }\n", "message"),
            ("unexpected: true\n", "unexpected"),
            (
                "constraints:\n  - kind: A\n    message: a\n    validated_by: [V]\n    composed_of: [{ kind: NotNul }, { kind: Size }]\n",
                "constraint kind 'A' is composed of unknown kind 'NotNul'",
            ),
            (
                "constraints:\n  - kind: A\n    message: a\n    validated_by: [V]\n    composed_of: [{ list: Size.List, members: [{ kind: Size }, { kind: Sise }] }]\n",
                "constraint kind 'A' is composed of unknown kind 'Sise'",
            ),
            (
                "builtins: false\nconstraints:\n  - kind: A\n    message: a\n    validated_by: [V]\n    composed_of: [{ kind: NotNull }]\n",
                "unknown kind 'NotNull'",
            ),
            (
                "constraints:\n  - kind: A\n    message: a\n    validated_by: [V]\n    composed_of: [{ kind: Size, attribute: { max: 3 } }]\n",
                "did not match any variant",
            ),
        ];

        for (document, expected) in cases {
            let err = loader.load_str(document, Format::Yaml).unwrap_err();
            assert!(matches!(err, LoaderError::InvalidDocument { .. }), "{}", document);
            assert!(err.to_string().contains(expected), "{} -> {}", document, err);
        }
    }

    #[test]
    fn test_cycle_detection() {
        let err = RegistryLoader::new()
            .load_str(
                r#"
constraints:
  - { kind: A, message: a, validated_by: [V], composed_of: [{ kind: B }] }
  - { kind: B, message: b, validated_by: [V], composed_of: [{ list: C.List, members: [{ kind: C }] }] }
  - { kind: C, message: c, validated_by: [V], composed_of: [{ kind: A }] }
"#,
                Format::Yaml,
            )
            .unwrap_err();
        assert!(err.to_string().contains("A -> B -> C -> A"), "{}", err);
    }

    #[test]
    fn test_properties_is_not_a_metadata_format() {
        assert!(matches!(
            RegistryLoader::new().load_str("a=b", Format::Properties),
            Err(LoaderError::UnsupportedFormat { .. })
        ));
    }
}
