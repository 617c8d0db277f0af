//! Message interpolation against a caller-supplied test bundle
//!
//! Mirrors how the traversal engine renders violations: a descriptor is built
//! once and templates are interpolated against it.

use serde_json::json;
use veritas_core::{
    BuiltinValidators, ConstraintDeclaration, ConstraintDefinition, ConstraintDescriptor,
    DescriptorBuilder, MessageInterpolator, MetadataRegistry, ResourceBundle,
    StaticBundleLocator, CachingBundleLocator,
};

fn registry() -> MetadataRegistry {
    MetadataRegistry::builder()
        .standard_builtins()
        .constraint(
            ConstraintDefinition::standard("Length", "{validator.length}")
                .attribute("min", json!(0))
                .attribute("max", json!(i32::MAX))
                .validated_by(["LengthValidator"]),
        )
        .build()
}

fn build(declaration: ConstraintDeclaration) -> ConstraintDescriptor {
    let registry = registry();
    let validators = BuiltinValidators::standard();
    DescriptorBuilder::new(&registry, &validators)
        .build(&declaration, &[])
        .expect("descriptor builds")
}

fn interpolator() -> MessageInterpolator<CachingBundleLocator<StaticBundleLocator>> {
    MessageInterpolator::caching(StaticBundleLocator::single(
        ResourceBundle::new().with_entry("foo", "replacement worked"),
    ))
}

#[cfg(test)]
mod successful_interpolation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_token() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        assert_eq!(
            interpolator().interpolate("{foo}", &descriptor, None),
            "replacement worked"
        );
    }

    #[test]
    fn test_repeated_token() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        assert_eq!(
            interpolator().interpolate("{foo} {foo}", &descriptor, None),
            "replacement worked replacement worked"
        );
    }

    #[test]
    fn test_token_inside_text() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        assert_eq!(
            interpolator().interpolate("This {foo} just fine", &descriptor, None),
            "This replacement worked just fine"
        );
    }

    #[test]
    fn test_mixed_valid_and_invalid_braces() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        assert_eq!(
            interpolator().interpolate("{} { {foo} }", &descriptor, None),
            "{} { replacement worked }"
        );
    }
}

#[cfg(test)]
mod unsuccessful_interpolation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_braces() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        assert_eq!(interpolator().interpolate("foo", &descriptor, None), "foo");
    }

    #[test]
    fn test_malformed_braces() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        assert_eq!(
            interpolator().interpolate("#{foo  {}", &descriptor, None),
            "#{foo  {}"
        );
    }

    #[test]
    fn test_unknown_token() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        assert_eq!(interpolator().interpolate("{bar}", &descriptor, None), "{bar}");
    }
}

#[cfg(test)]
mod default_interpolation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_bundle_message() {
        let descriptor = build(ConstraintDeclaration::new("NotNull"));
        let template = descriptor.message_template().unwrap().to_string();
        assert_eq!(
            interpolator().interpolate(&template, &descriptor, None),
            "may not be null"
        );
    }

    #[test]
    fn test_bundle_entry_resolved_against_parameters() {
        let descriptor = build(ConstraintDeclaration::new("Length"));
        assert_eq!(
            interpolator().interpolate("{validator.length}", &descriptor, None),
            "length must be between 0 and 2147483647"
        );
    }

    #[test]
    fn test_string_parameters_are_inserted_raw() {
        let descriptor = build(ConstraintDeclaration::new("Pattern").with_attribute("regexp", "[0-9]+"));
        assert_eq!(
            interpolator().interpolate("{validator.pattern}", &descriptor, Some(&json!("abc"))),
            "must match \"[0-9]+\""
        );
    }

    #[test]
    fn test_parameter_values_containing_braces_survive() {
        let descriptor = build(ConstraintDeclaration::new("Pattern").with_attribute("regexp", "[0-9]{3}"));
        assert_eq!(
            interpolator().interpolate("{validator.pattern}", &descriptor, None),
            "must match \"[0-9]{3}\""
        );
    }
}
