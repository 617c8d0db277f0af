//! Document parsing for YAML, JSON and `.properties` formats
//!
//! Copyright (c) 2025 Veritas Team
//! Licensed under the Apache-2.0 license

use crate::error::{LoaderError, LoaderResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::Chars;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
    /// Java-style `key=value` lines (.properties)
    Properties,
}

impl Format {
    /// Every format, in the order bundle files are looked up
    pub const ALL: [Format; 3] = [Format::Properties, Format::Yaml, Format::Json];

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            Some("properties") => Ok(Format::Properties),
            _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
        }
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
            Format::Properties => &["properties"],
        }
    }

    /// Whether documents of this format can hold nested structures
    pub fn is_structured(&self) -> bool {
        !matches!(self, Format::Properties)
    }
}

/// Parser turning document files into JSON values
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a file, detecting format from extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<Value> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        self.parse_content(&content, format, path)
    }

    /// Parse content with explicit format
    ///
    /// `.properties` content becomes a flat object of string values.
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, path),
            Format::Json => self.parse_json(content, path),
            Format::Properties => {
                let entries = self.parse_properties(content, path)?;
                Ok(Value::Object(
                    entries
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect::<Map<_, _>>(),
                ))
            }
        }
    }

    /// Parse YAML content
    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        // Parse as YAML first so YAML syntax errors are reported as such
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))?;

        serde_json::to_value(yaml_value)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Parse JSON content
    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Parse `.properties` content
    ///
    /// Supports `#`/`!` comment lines, `=`, `:` or whitespace separators,
    /// backslash line continuations and the `\t \n \r \f \uXXXX` escapes.
    /// A later duplicate key replaces the earlier one.
    pub fn parse_properties(
        &self,
        content: &str,
        path: &Path,
    ) -> LoaderResult<BTreeMap<String, String>> {
        let mut entries = BTreeMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line = raw.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let mut logical = line.to_string();
            while has_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let invalid =
                |reason: String| LoaderError::properties_parse_error(path.to_path_buf(), index + 1, reason);
            entries.insert(unescape(key).map_err(invalid)?, unescape(value).map_err(invalid)?);
        }

        Ok(entries)
    }
}

/// A line continues when it ends in an odd number of backslashes
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim_start();
    (&line[..key_end], value)
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Decode the code unit after `\u`, pairing a high surrogate with the
/// `\uXXXX` low surrogate that must follow it
fn unicode_escape(chars: &mut Chars<'_>) -> Result<char, String> {
    let high = hex_unit(chars)?;
    if !(0xD800..=0xDBFF).contains(&high) {
        return char::from_u32(high).ok_or_else(|| format!("invalid code point \\u{:04X}", high));
    }

    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(format!("unpaired surrogate \\u{:04X}", high));
    }
    let low = hex_unit(chars)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(format!("unpaired surrogate \\u{:04X}", high));
    }

    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or_else(|| format!("invalid code point U+{:X}", code))
}

fn hex_unit(chars: &mut Chars<'_>) -> Result<u32, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return Err(format!("malformed \\uxxxx encoding '\\u{}'", digits));
    }
    u32::from_str_radix(&digits, 16).map_err(|_| format!("malformed \\uxxxx encoding '\\u{}'", digits))
}
