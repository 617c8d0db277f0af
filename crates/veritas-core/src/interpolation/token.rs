//! Recognition and substitution of `{identifier}` tokens
//!
//! A token is `{` followed by one or more of `[A-Za-z0-9_.]` and `}`. Any
//! other brace sequence (`{}`, braces around whitespace, an unbalanced `{`)
//! is plain text.
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_.]+)\}").expect("token pattern is valid"))
}

pub fn contains_tokens(template: &str) -> bool {
    token_regex().is_match(template)
}

/// Replace every token `resolve` knows; unknown tokens stay verbatim
///
/// Borrows the input when nothing was replaced.
pub fn replace_tokens<'t, F>(template: &'t str, mut resolve: F) -> Cow<'t, str>
where
    F: FnMut(&str) -> Option<String>,
{
    token_regex().replace_all(template, |caps: &Captures<'_>| {
        resolve(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
}
