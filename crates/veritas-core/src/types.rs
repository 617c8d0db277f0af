//! Core value types shared by the metadata, descriptor and interpolation layers
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Constraint parameters keyed by attribute name
pub type Parameters = BTreeMap<String, Value>;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new<S: AsRef<str>>(name: S) -> Self {
                Self(Arc::from(name.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(Arc::from(name))
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }
    };
}

identifier!(
    /// Identity of a constraint type, e.g. `NotNull` or `Length`
    ConstraintKind
);

identifier!(
    /// A validation group tag
    Group
);

identifier!(
    /// Identifier of a validator implementation
    ValidatorId
);

impl Group {
    /// Name of the group constraints belong to when none is given
    pub const DEFAULT: &'static str = "Default";

    /// The `Default` group
    pub fn default_group() -> Self {
        Self::new(Self::DEFAULT)
    }

    pub fn is_default(&self) -> bool {
        self.as_str() == Self::DEFAULT
    }
}

/// A single applied rule instance: kind, attribute values and explicit groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintDeclaration {
    pub kind: ConstraintKind,
    #[serde(default)]
    pub attributes: Parameters,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl ConstraintDeclaration {
    pub fn new<K: Into<ConstraintKind>>(kind: K) -> Self {
        Self {
            kind: kind.into(),
            attributes: Parameters::new(),
            groups: Vec::new(),
        }
    }

    /// Set an attribute value
    pub fn with_attribute<N: Into<String>, V: Into<Value>>(mut self, name: N, value: V) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add an explicit group
    pub fn with_group<G: Into<Group>>(mut self, group: G) -> Self {
        self.groups.push(group.into());
        self
    }

    /// A copy of this declaration whose attributes are replaced by `overrides`
    ///
    /// Names missing from the declaration are added as-is.
    pub fn with_overrides(&self, overrides: &Parameters) -> Self {
        let mut attributes = self.attributes.clone();
        for (name, value) in overrides {
            attributes.insert(name.clone(), value.clone());
        }
        Self {
            kind: self.kind.clone(),
            attributes,
            groups: self.groups.clone(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// A locale made of a language, an optional country and an optional variant
///
/// Parsed from `en`, `en_US`, `en-US` or `de_AT_EURO`. The empty string is
/// the root locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    pub fn new<L: Into<String>, C: Into<String>>(language: L, country: C) -> Self {
        Self {
            language: language.into().to_lowercase(),
            country: country.into().to_uppercase(),
            variant: String::new(),
        }
    }

    /// The root locale, holding locale-independent resources
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a locale tag; separators may be `_` or `-`
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.trim().split(['_', '-']);
        let language = parts.next().unwrap_or_default().to_lowercase();
        let country = parts.next().unwrap_or_default().to_uppercase();
        let variant = parts.collect::<Vec<_>>().join("_");
        Self {
            language,
            country,
            variant,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }

    /// Lookup candidates from the most specific locale down to the root
    ///
    /// `de_AT_EURO` yields `de_AT_EURO`, `de_AT`, `de`, root.
    pub fn candidates(&self) -> Vec<Locale> {
        let mut candidates = Vec::with_capacity(4);
        if !self.variant.is_empty() {
            candidates.push(self.clone());
        }
        if !self.country.is_empty() {
            candidates.push(Locale {
                language: self.language.clone(),
                country: self.country.clone(),
                variant: String::new(),
            });
        }
        if !self.language.is_empty() {
            candidates.push(Locale::new(self.language.clone(), ""));
        }
        candidates.push(Locale::root());
        candidates
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale::parse(&tag)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::parse(tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

/// Textual form of a parameter value as it appears in rendered messages
///
/// Strings are inserted raw, arrays as `[a, b]`, everything else through its
/// JSON representation.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_equality_is_structural() {
        assert_eq!(ConstraintKind::new("Length"), ConstraintKind::from("Length"));
        assert_ne!(ConstraintKind::new("Length"), ConstraintKind::new("Size"));
        assert_eq!(Group::default_group().as_str(), "Default");
        assert!(Group::default_group().is_default());
    }

    #[test]
    fn test_identifier_serde_is_transparent() {
        let kind: ConstraintKind = serde_json::from_value(json!("NotNull")).unwrap();
        assert_eq!(kind.as_str(), "NotNull");
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("NotNull"));
    }

    #[test]
    fn test_declaration_rejects_unknown_fields() {
        let decl: ConstraintDeclaration =
            serde_json::from_value(json!({"kind": "Size", "attributes": {"max": 3}})).unwrap();
        assert_eq!(decl.attribute("max"), Some(&json!(3)));
        assert!(decl.groups.is_empty());

        let misspelled =
            serde_json::from_value::<ConstraintDeclaration>(json!({"kind": "Size", "attribute": {"max": 3}}));
        assert!(misspelled.unwrap_err().to_string().contains("attribute"));
    }

    #[test]
    fn test_declaration_with_overrides_replaces_values() {
        let decl = ConstraintDeclaration::new("Length")
            .with_attribute("min", 0)
            .with_attribute("max", 10);

        let mut overrides = Parameters::new();
        overrides.insert("max".to_string(), json!(5));
        overrides.insert("extra".to_string(), json!("kept"));

        let overridden = decl.with_overrides(&overrides);
        assert_eq!(overridden.attribute("min"), Some(&json!(0)));
        assert_eq!(overridden.attribute("max"), Some(&json!(5)));
        assert_eq!(overridden.attribute("extra"), Some(&json!("kept")));
        // original untouched
        assert_eq!(decl.attribute("max"), Some(&json!(10)));
    }

    #[test]
    fn test_locale_parsing() {
        let locale = Locale::parse("en-us");
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.country(), "US");
        assert_eq!(locale.to_string(), "en_US");

        let with_variant = Locale::parse("de_AT_EURO");
        assert_eq!(with_variant.variant(), "EURO");
        assert_eq!(with_variant.to_string(), "de_AT_EURO");

        assert!(Locale::parse("").is_root());
        assert_eq!(Locale::root().to_string(), "");
    }

    #[test]
    fn test_locale_candidates() {
        let candidates: Vec<String> = Locale::parse("de_AT_EURO")
            .candidates()
            .into_iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(candidates, vec!["de_AT_EURO", "de_AT", "de", ""]);

        assert_eq!(Locale::root().candidates(), vec![Locale::root()]);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(2147483647)), "2147483647");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(null)), "null");
        assert_eq!(display_value(&json!(["a", 1])), "[a, 1]");
        assert_eq!(display_value(&json!({"k": "v"})), "{\"k\":\"v\"}");
    }
}
