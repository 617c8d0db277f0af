//! The message interpolation engine
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use super::token::{contains_tokens, replace_tokens};
use super::InterpolationConfig;
use crate::bundle::{default_bundle, BundleLocator, CacheConfig, CachingBundleLocator, ResourceBundle};
use crate::context::ConstraintContext;
use crate::descriptor::ConstraintDescriptor;
use crate::types::{display_value, Locale};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{trace, warn};

/// A rendered message together with the template it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationMessage {
    pub template: String,
    pub message: String,
    pub property: Option<String>,
}

/// Renders message templates for constraint descriptors
///
/// Interpolation never fails: unknown tokens, malformed braces and
/// self-referential bundle entries all degrade to a best-effort string.
/// Safe to share between threads.
#[derive(Debug)]
pub struct MessageInterpolator<L> {
    bundles: L,
    default_bundle: Arc<ResourceBundle>,
    config: InterpolationConfig,
}

impl<L: BundleLocator> MessageInterpolator<CachingBundleLocator<L>> {
    /// Interpolator consulting `delegate` through a bundle cache
    pub fn caching(delegate: L) -> Self {
        Self::new(CachingBundleLocator::new(delegate))
    }

    /// Interpolator with explicit interpolation and cache settings
    pub fn caching_with_config(delegate: L, config: InterpolationConfig, cache: CacheConfig) -> Self {
        Self::with_config(CachingBundleLocator::with_config(delegate, cache), config)
    }
}

impl<L: BundleLocator> MessageInterpolator<L> {
    /// Interpolator using `bundles` as caller-supplied bundles, as given
    pub fn new(bundles: L) -> Self {
        Self::with_config(bundles, InterpolationConfig::default())
    }

    pub fn with_config(bundles: L, config: InterpolationConfig) -> Self {
        Self {
            bundles,
            default_bundle: default_bundle(),
            config,
        }
    }

    /// Replace the built-in default bundle
    pub fn with_default_bundle(mut self, bundle: ResourceBundle) -> Self {
        self.default_bundle = Arc::new(bundle);
        self
    }

    pub fn bundles(&self) -> &L {
        &self.bundles
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Render `template` in the default locale
    pub fn interpolate(
        &self,
        template: &str,
        descriptor: &ConstraintDescriptor,
        value: Option<&Value>,
    ) -> String {
        self.interpolate_for_locale(template, descriptor, value, &self.config.default_locale)
    }

    /// Render `template` in `locale`
    pub fn interpolate_for_locale(
        &self,
        template: &str,
        descriptor: &ConstraintDescriptor,
        value: Option<&Value>,
        locale: &Locale,
    ) -> String {
        trace!(template, locale = %locale, validated_value = ?value, "Interpolating message");
        if !contains_tokens(template) {
            return template.to_string();
        }

        let user_bundle = self.bundles.bundle(locale);
        let max_passes = self.config.max_passes.max(1);
        let mut current = template.to_string();

        for pass in 1..=max_passes {
            let next = match replace_tokens(&current, |id| {
                self.resolve(id, user_bundle.as_deref(), descriptor)
            }) {
                Cow::Borrowed(_) => None,
                Cow::Owned(replaced) => Some(replaced),
            };
            match next {
                Some(replaced) if replaced != current => current = replaced,
                _ => {
                    trace!(passes = pass, "Message interpolation settled");
                    return current;
                }
            }
        }

        warn!(
            template,
            max_passes,
            "Message interpolation did not settle, returning the result of the last pass"
        );
        current
    }

    /// Render every message pending in `context`
    pub fn render(
        &self,
        context: &ConstraintContext,
        descriptor: &ConstraintDescriptor,
        value: Option<&Value>,
    ) -> Vec<ViolationMessage> {
        context
            .messages()
            .into_iter()
            .map(|error| ViolationMessage {
                message: self.interpolate(&error.template, descriptor, value),
                template: error.template,
                property: error.property,
            })
            .collect()
    }

    /// Render the descriptor's own message template in `locale`
    pub fn default_message(
        &self,
        descriptor: &ConstraintDescriptor,
        value: Option<&Value>,
        locale: &Locale,
    ) -> Option<String> {
        descriptor
            .message_template()
            .map(|template| self.interpolate_for_locale(template, descriptor, value, locale))
    }

    fn resolve(
        &self,
        id: &str,
        user_bundle: Option<&ResourceBundle>,
        descriptor: &ConstraintDescriptor,
    ) -> Option<String> {
        user_bundle
            .and_then(|bundle| bundle.get(id))
            .or_else(|| self.default_bundle.get(id))
            .map(str::to_string)
            .or_else(|| descriptor.parameter(id).map(display_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{NoBundles, StaticBundleLocator};
    use crate::descriptor::DescriptorBuilder;
    use crate::metadata::{BuiltinValidators, ConstraintDefinition, MetadataRegistry};
    use crate::types::ConstraintDeclaration;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn descriptor(declaration: ConstraintDeclaration) -> ConstraintDescriptor {
        let registry = MetadataRegistry::builder()
            .standard_builtins()
            .constraint(
                ConstraintDefinition::standard("Length", "{validator.length}")
                    .attribute("min", json!(0))
                    .attribute("max", json!(i32::MAX))
                    .validated_by(["LengthValidator"]),
            )
            .build();
        let validators = BuiltinValidators::standard();
        DescriptorBuilder::new(&registry, &validators)
            .build(&declaration, &[])
            .unwrap()
    }

    #[test]
    fn test_user_bundle_wins_over_default_bundle() {
        let interpolator = MessageInterpolator::new(StaticBundleLocator::single(
            ResourceBundle::new().with_entry("validator.notNull", "must be set"),
        ));
        let notnull = descriptor(ConstraintDeclaration::new("NotNull"));

        assert_eq!(
            interpolator.interpolate("{validator.notNull}", &notnull, None),
            "must be set"
        );
    }

    #[test]
    fn test_bundle_wins_over_parameters() {
        let interpolator = MessageInterpolator::new(StaticBundleLocator::single(
            ResourceBundle::new().with_entry("min", "bundle min"),
        ));
        let length = descriptor(ConstraintDeclaration::new("Length").with_attribute("min", 3));

        assert_eq!(interpolator.interpolate("{min} {max}", &length, None), "bundle min 2147483647");
    }

    #[test]
    fn test_self_reference_terminates() {
        let interpolator = MessageInterpolator::with_config(
            StaticBundleLocator::single(
                ResourceBundle::new()
                    .with_entry("loop", "again {loop}")
                    .with_entry("ping", "{pong}")
                    .with_entry("pong", "{ping}"),
            ),
            InterpolationConfig {
                max_passes: 3,
                ..InterpolationConfig::default()
            },
        );
        let notnull = descriptor(ConstraintDeclaration::new("NotNull"));

        assert_eq!(
            interpolator.interpolate("{loop}", &notnull, None),
            "again again again {loop}"
        );
        assert_eq!(interpolator.interpolate("{ping}", &notnull, None), "{pong}");
    }

    #[test]
    fn test_locale_selects_bundle() {
        let interpolator = MessageInterpolator::caching(
            StaticBundleLocator::new()
                .with_bundle("de", ResourceBundle::new().with_entry("validator.notNull", "darf nicht null sein")),
        );
        let notnull = descriptor(ConstraintDeclaration::new("NotNull"));

        assert_eq!(
            interpolator.default_message(&notnull, None, &Locale::parse("de")),
            Some("darf nicht null sein".to_string())
        );
        assert_eq!(
            interpolator.default_message(&notnull, None, &Locale::parse("en")),
            Some("may not be null".to_string())
        );
        assert_eq!(interpolator.bundles().len(), 1);
    }

    #[test]
    fn test_render_context() {
        let interpolator = MessageInterpolator::new(NoBundles);
        let length = descriptor(ConstraintDeclaration::new("Length").with_attribute("max", 5));

        let mut context = ConstraintContext::new("{validator.length}");
        context.add_error_for_property("at most {max} characters", "name");

        let rendered = interpolator.render(&context, &length, Some(&json!("too long")));
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].message, "length must be between 0 and 5");
        assert_eq!(rendered[1].message, "at most 5 characters");
        assert_eq!(rendered[1].template, "at most {max} characters");
        assert_eq!(rendered[1].property.as_deref(), Some("name"));
    }

    #[test]
    fn test_token_free_template_skips_bundle_lookup() {
        #[derive(Default)]
        struct Counting(AtomicUsize);

        impl BundleLocator for Counting {
            fn bundle(&self, _locale: &Locale) -> Option<Arc<ResourceBundle>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                None
            }
        }

        let interpolator = MessageInterpolator::new(Counting::default());
        let notnull = descriptor(ConstraintDeclaration::new("NotNull"));

        assert_eq!(interpolator.interpolate("{} { x } {open", &notnull, None), "{} { x } {open");
        assert_eq!(interpolator.bundles().0.load(Ordering::SeqCst), 0);

        interpolator.interpolate("{x}", &notnull, None);
        assert_eq!(interpolator.bundles().0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_custom_default_bundle() {
        let interpolator = MessageInterpolator::new(NoBundles)
            .with_default_bundle(ResourceBundle::new().with_entry("validator.notNull", "required"));
        let notnull = descriptor(ConstraintDeclaration::new("NotNull"));

        assert_eq!(interpolator.interpolate("{validator.notNull}", &notnull, None), "required");
    }
}
