//! Wikilink extraction and rewriting
//!
//! Supported forms:
//! - `[[Note]]`
//! - `[[Note|alias]]`
//! - `[[Note#Section]]`
//! - `[[Note#Section|alias]]`
//!
//! The target name stops at the first `#`, `|` or `]`. References inside code
//! fences are extracted like any other text, so the reference graph and the
//! rename/delete rewrites always agree on what counts as a link.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static WIKILINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]#|]+)(?:#([^\]|]*))?(?:\|([^\]]*))?\]\]").expect("wikilink regex")
});

/// One wikilink occurrence in a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wikilink {
    /// Referenced note name, exactly as written
    pub target: String,
    /// Section fragment after `#`, if non-empty
    pub section: Option<String>,
    /// Display alias after `|`
    pub alias: Option<String>,
    /// Byte range of the whole `[[...]]`
    pub span: Range<usize>,
    /// Byte range of the target name alone
    pub target_span: Range<usize>,
}

impl Wikilink {
    /// 1-based line number of this link within `text`
    pub fn line_in(&self, text: &str) -> usize {
        text[..self.span.start].matches('\n').count() + 1
    }
}

/// A single substitution against the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset where the replaced range starts
    pub offset: usize,
    /// Number of bytes to remove
    pub remove_len: usize,
    /// Replacement text
    pub insert_text: String,
}

/// Extract every wikilink occurrence in document order.
pub fn extract_wikilinks(text: &str) -> Vec<Wikilink> {
    if !text.contains("[[") {
        return Vec::new();
    }

    WIKILINK_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let target = caps.get(1)?;
            Some(Wikilink {
                target: target.as_str().to_string(),
                section: caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .filter(|s| !s.is_empty()),
                alias: caps.get(3).map(|m| m.as_str().to_string()),
                span: whole.range(),
                target_span: target.range(),
            })
        })
        .collect()
}

/// Names referenced by `text`, in order and with duplicates.
pub fn outgoing_links(text: &str) -> Vec<String> {
    extract_wikilinks(text)
        .into_iter()
        .map(|link| link.target)
        .collect()
}

/// Edits that retarget every link to `old_name` at `new_name`.
///
/// Matching is exact and case-sensitive on the whole target, so `[[Plan]]`
/// is never touched when renaming `Plan B`. Section fragments and aliases are
/// kept. Edits are returned in reverse offset order so they can be applied
/// one after another without shifting later offsets.
pub fn compute_rename_edits(text: &str, old_name: &str, new_name: &str) -> Vec<TextEdit> {
    let mut edits: Vec<TextEdit> = extract_wikilinks(text)
        .into_iter()
        .filter(|link| link.target == old_name)
        .map(|link| TextEdit {
            offset: link.target_span.start,
            remove_len: link.target_span.len(),
            insert_text: new_name.to_string(),
        })
        .collect();

    edits.sort_by(|a, b| b.offset.cmp(&a.offset));
    edits
}

/// Apply edits produced by [`compute_rename_edits`].
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut out = text.to_string();
    for edit in edits {
        out.replace_range(edit.offset..edit.offset + edit.remove_len, &edit.insert_text);
    }
    out
}

/// Retarget links from `old_name` to `new_name`.
///
/// Returns the rewritten text and the number of links changed, or `None` when
/// the text holds no link to `old_name`.
pub fn rewrite_links(text: &str, old_name: &str, new_name: &str) -> Option<(String, usize)> {
    let edits = compute_rename_edits(text, old_name, new_name);
    if edits.is_empty() {
        return None;
    }
    Some((apply_edits(text, &edits), edits.len()))
}
