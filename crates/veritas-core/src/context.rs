//! Per-invocation collector of the error messages a validator raises
//!
//! A validator receives a [`ConstraintContext`] holding the constraint's
//! default message template. It may add further unexpanded messages, target
//! them at a sub-property, or suppress the default one. The messages are
//! rendered afterwards by the
//! [`MessageInterpolator`](crate::interpolation::MessageInterpolator).
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

/// An unexpanded error message raised during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub template: String,
    /// Sub-property the message targets; `None` means the validated element itself
    pub property: Option<String>,
}

/// Messages raised while applying one constraint to one value
#[derive(Debug, Clone)]
pub struct ConstraintContext {
    default_message: String,
    default_disabled: bool,
    errors: Vec<ErrorMessage>,
}

impl ConstraintContext {
    pub fn new<M: Into<String>>(default_message: M) -> Self {
        Self {
            default_message: default_message.into(),
            default_disabled: false,
            errors: Vec::new(),
        }
    }

    /// Suppress the default message
    pub fn disable_default_error(&mut self) {
        self.default_disabled = true;
    }

    pub fn is_default_error_disabled(&self) -> bool {
        self.default_disabled
    }

    /// The unexpanded default message
    pub fn default_error_message(&self) -> &str {
        &self.default_message
    }

    /// Add an unexpanded message for the validated element
    pub fn add_error<M: Into<String>>(&mut self, message: M) {
        self.errors.push(ErrorMessage {
            template: message.into(),
            property: None,
        });
    }

    /// Add an unexpanded message for a named sub-property
    pub fn add_error_for_property<M: Into<String>, P: Into<String>>(&mut self, message: M, property: P) {
        self.errors.push(ErrorMessage {
            template: message.into(),
            property: Some(property.into()),
        });
    }

    /// Every message to report: the default one first unless disabled, then
    /// the added ones in order
    pub fn messages(&self) -> Vec<ErrorMessage> {
        let default = (!self.default_disabled).then(|| ErrorMessage {
            template: self.default_message.clone(),
            property: None,
        });
        default.into_iter().chain(self.errors.iter().cloned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_only() {
        let context = ConstraintContext::new("{validator.notNull}");
        assert_eq!(context.default_error_message(), "{validator.notNull}");
        assert_eq!(
            context.messages(),
            vec![ErrorMessage {
                template: "{validator.notNull}".to_string(),
                property: None,
            }]
        );
    }

    #[test]
    fn test_added_messages_follow_default() {
        let mut context = ConstraintContext::new("default");
        context.add_error("first");
        context.add_error_for_property("second", "street");

        let messages = context.messages();
        let templates: Vec<&str> = messages.iter().map(|m| m.template.as_str()).collect();
        assert_eq!(templates, vec!["default", "first", "second"]);
        assert_eq!(messages[2].property.as_deref(), Some("street"));
    }

    #[test]
    fn test_disabled_default() {
        let mut context = ConstraintContext::new("default");
        context.disable_default_error();
        assert!(context.messages().is_empty());

        context.add_error("only");
        assert_eq!(context.messages().len(), 1);
        assert!(context.is_default_error_disabled());
    }
}
