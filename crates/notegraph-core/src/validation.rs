//! Structural validation of note names and content
//!
//! Blocking checks return an error and must pass before anything is written:
//! note names, heading script, and section references into existing notes.
//! Non-blocking checks produce [`ValidationWarning`]s after a write.

use crate::error::{VaultError, VaultResult};
use crate::vault::VaultIndex;
use notegraph_parser::markdown::{fenced_line_mask, parse_heading, scan_fences};
use notegraph_parser::{extract_wikilinks, headings};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Obsidian Tasks markers permitted in note names
pub const TASKS_EMOJIS: &str = "➕⏳🛫📅✅❌⏬🔽🔼⏫🔺🔁🏁🆔⛔";

static ALLOWED_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^[a-zA-Z0-9 _@\-{TASKS_EMOJIS}]+$")).expect("note name regex")
});

static CYRILLIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{0400}-\x{04FF}]").expect("cyrillic regex"));

static TABLE_ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|.*\|$").expect("table row regex"));

static TABLE_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[-:| ]+\|$").expect("table separator regex"));

/// Identifier of a non-blocking rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningRule {
    TableBlankLine,
    UnclosedCodeBlock,
    BrokenLink,
}

impl WarningRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TableBlankLine => "table-blank-line",
            Self::UnclosedCodeBlock => "unclosed-code-block",
            Self::BrokenLink => "broken-link",
        }
    }
}

impl fmt::Display for WarningRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal finding returned alongside a successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// 1-based line number
    pub line: usize,
    pub message: String,
    pub rule: WarningRule,
}

impl ValidationWarning {
    fn new(line: usize, message: impl Into<String>, rule: WarningRule) -> Self {
        Self {
            line,
            message: message.into(),
            rule,
        }
    }
}

/// Stateless structural checks
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Reject names outside ASCII letters, digits, space, `_`, `-`, `@` and
    /// the Tasks markers.
    pub fn validate_name(&self, name: &str) -> VaultResult<()> {
        if CYRILLIC_REGEX.is_match(name) {
            return Err(VaultError::InvalidName(format!(
                "Note name contains Cyrillic: {name}"
            )));
        }
        if !ALLOWED_NAME_REGEX.is_match(name) {
            return Err(VaultError::InvalidName(format!(
                "Note name contains invalid characters: {name}"
            )));
        }
        Ok(())
    }

    /// Reject headings written in a non-Latin script. Headings inside closed
    /// code fences are ignored.
    pub fn validate_headings(&self, content: &str) -> VaultResult<()> {
        let lines: Vec<&str> = content.split('\n').collect();
        let fenced = fenced_line_mask(&lines, true);

        for (idx, line) in lines.iter().enumerate() {
            if fenced[idx] {
                continue;
            }
            let Some((_, text)) = parse_heading(line) else {
                continue;
            };
            let line_num = idx + 1;
            if CYRILLIC_REGEX.is_match(text) {
                return Err(VaultError::InvalidHeading(format!(
                    "Heading contains Cyrillic at line {line_num}: {text}"
                )));
            }
            if text.chars().any(is_non_latin_letter) {
                return Err(VaultError::InvalidHeading(format!(
                    "Heading contains non-Latin characters at line {line_num}: {text}"
                )));
            }
        }
        Ok(())
    }

    /// Post-write checks: fence balance, then table spacing.
    pub fn validate(&self, content: &str) -> Vec<ValidationWarning> {
        let lines: Vec<&str> = content.split('\n').collect();

        let mut warnings: Vec<ValidationWarning> = scan_fences(&lines)
            .into_iter()
            .filter(|block| !block.is_closed())
            .map(|block| {
                ValidationWarning::new(
                    block.start + 1,
                    "Unclosed fenced code block",
                    WarningRule::UnclosedCodeBlock,
                )
            })
            .collect();

        warnings.extend(self.check_tables(&lines));
        warnings
    }

    fn check_tables(&self, lines: &[&str]) -> Vec<ValidationWarning> {
        let fenced = fenced_line_mask(lines, true);

        lines
            .windows(2)
            .enumerate()
            .filter(|(idx, _)| !fenced[*idx])
            .filter(|(_, pair)| TABLE_ROW_REGEX.is_match(pair[0]) && TABLE_SEPARATOR_REGEX.is_match(pair[1]))
            .filter(|(idx, _)| *idx > 0 && !lines[idx - 1].trim().is_empty())
            .map(|(idx, _)| {
                ValidationWarning::new(
                    idx + 1,
                    "Table should have blank line before it",
                    WarningRule::TableBlankLine,
                )
            })
            .collect()
    }

    /// Check every wikilink in `content` against `index`.
    ///
    /// A link to a missing note is a forward reference and only warns. A link
    /// to a section the existing target does not have is a blocking error.
    pub fn validate_links(&self, content: &str, index: &VaultIndex) -> VaultResult<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        for link in extract_wikilinks(content) {
            let target = link.target.trim();
            let Some(note) = index.get(target) else {
                warnings.push(ValidationWarning::new(
                    link.line_in(content),
                    format!("Link to non-existent note: {target}"),
                    WarningRule::BrokenLink,
                ));
                continue;
            };

            let Some(section) = link.section.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            if !headings(&note.body).iter().any(|h| h.text == section) {
                return Err(VaultError::BrokenLink {
                    note: target.to_string(),
                    section: section.to_string(),
                });
            }
        }

        Ok(warnings)
    }
}

/// Alphabetic and outside the Latin blocks
fn is_non_latin_letter(c: char) -> bool {
    if !c.is_alphabetic() {
        return false;
    }
    !matches!(c,
        'a'..='z'
        | 'A'..='Z'
        | '\u{00AA}'
        | '\u{00BA}'
        | '\u{00C0}'..='\u{024F}'
        | '\u{1E00}'..='\u{1EFF}'
        | '\u{2C60}'..='\u{2C7F}'
        | '\u{A720}'..='\u{A7FF}'
        | '\u{AB30}'..='\u{AB6F}'
        | '\u{FF21}'..='\u{FF3A}'
        | '\u{FF41}'..='\u{FF5A}')
}
