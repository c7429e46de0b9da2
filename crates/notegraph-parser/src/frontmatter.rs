//! Frontmatter handling
//!
//! A note may open with a YAML block fenced by `---` lines. The block is
//! parsed into an insertion-ordered [`Mapping`] so that rewriting a note keeps
//! its keys where the author put them.

use crate::error::{ParseError, ParseResult};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use std::sync::LazyLock;

static FRONTMATTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\n(.*?)\n---(?:\n|\z)(.*)\z").expect("frontmatter regex")
});

/// Key holding a note's tags
pub const TAGS_KEY: &str = "tags";

/// Strip a leading byte-order mark and convert CRLF line endings to LF.
pub fn normalize(raw: &str) -> Cow<'_, str> {
    let without_bom = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    if without_bom.contains("\r\n") {
        Cow::Owned(without_bom.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(without_bom)
    }
}

/// Split normalized text into the raw YAML block (if any) and the body.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    match FRONTMATTER_REGEX.captures(text) {
        Some(caps) => {
            let yaml = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            (Some(yaml), body)
        }
        None => (None, text),
    }
}

/// Parse a YAML block into a mapping. An empty block yields an empty mapping.
pub fn parse_frontmatter(yaml: &str) -> ParseResult<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(ParseError::not_a_mapping(&other)),
    }
}

/// Render a note from its frontmatter and body.
///
/// Empty frontmatter produces the body alone, with no delimiter lines.
pub fn serialize_note(frontmatter: &Mapping, body: &str) -> ParseResult<String> {
    if frontmatter.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{yaml}---\n{body}"))
}

/// Read the tag list out of a frontmatter mapping.
///
/// A single scalar is coerced into a one-element list; anything other than a
/// string or a list yields no tags.
pub fn extract_tags(frontmatter: &Mapping) -> Vec<String> {
    match frontmatter.get(TAGS_KEY) {
        Some(Value::String(tag)) => vec![tag.clone()],
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    }
}

/// Look up a string-valued frontmatter field.
pub fn get_str<'a>(frontmatter: &'a Mapping, key: &str) -> Option<&'a str> {
    frontmatter.get(key).and_then(Value::as_str)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
