//! Line-level markdown structure: fenced code blocks and ATX headings
//!
//! A fence opens on a line starting with three or more backticks. While a
//! fence is open, a backtick run at least as long as the opener closes it;
//! shorter runs are plain content of the open block.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(`{3,})").expect("fence regex"));

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#+)\s+(.+)$").expect("heading regex"));

/// A fenced code block, by 0-based line index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceBlock {
    /// Line holding the opening fence
    pub start: usize,
    /// Line holding the closing fence, `None` if never closed
    pub end: Option<usize>,
    /// Length of the opening backtick run
    pub width: usize,
}

impl FenceBlock {
    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    /// Whether `line` is the fence itself or inside it. Unclosed blocks run to
    /// the end of the text.
    pub fn covers(&self, line: usize) -> bool {
        line >= self.start && self.end.map_or(true, |end| line <= end)
    }
}

/// An ATX heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Number of leading `#` characters
    pub level: usize,
    /// Heading text with surrounding whitespace trimmed
    pub text: String,
    /// 1-based line number
    pub line: usize,
}

/// Length of the backtick run that opens `line`, if it is a fence line.
pub fn fence_width(line: &str) -> Option<usize> {
    FENCE_REGEX.captures(line).map(|caps| caps[1].len())
}

/// Split a heading line into its level and raw text.
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING_REGEX.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str();
    Some((level, text))
}

/// Find every fenced block in `lines`.
pub fn scan_fences(lines: &[&str]) -> Vec<FenceBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<FenceBlock> = None;

    for (idx, line) in lines.iter().enumerate() {
        let Some(width) = fence_width(line) else {
            continue;
        };
        match open.take() {
            None => {
                open = Some(FenceBlock {
                    start: idx,
                    end: None,
                    width,
                })
            }
            Some(block) if width >= block.width => blocks.push(FenceBlock {
                end: Some(idx),
                ..block
            }),
            Some(block) => open = Some(block),
        }
    }

    blocks.extend(open);
    blocks
}

/// Per-line flag marking lines that belong to a fenced block.
///
/// With `closed_only`, lines after an unclosed opener are left unmarked.
pub fn fenced_line_mask(lines: &[&str], closed_only: bool) -> Vec<bool> {
    let mut mask = vec![false; lines.len()];
    for block in scan_fences(lines) {
        if closed_only && !block.is_closed() {
            continue;
        }
        let end = block.end.unwrap_or(lines.len().saturating_sub(1));
        for flag in mask.iter_mut().take(end + 1).skip(block.start) {
            *flag = true;
        }
    }
    mask
}

/// All headings in `text` outside fenced code.
pub fn headings(text: &str) -> Vec<Heading> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mask = fenced_line_mask(&lines, false);

    lines
        .iter()
        .enumerate()
        .filter(|(idx, _)| !mask[*idx])
        .filter_map(|(idx, line)| {
            parse_heading(line).map(|(level, text)| Heading {
                level,
                text: text.trim().to_string(),
                line: idx + 1,
            })
        })
        .collect()
}
