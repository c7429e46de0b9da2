//! Heading-delimited sections of a note body
//!
//! A section starts at its heading line and runs up to, but not including, the
//! next heading of the same or a shallower level. Deeper headings belong to
//! the section. Lines inside code fences never start or end a section.

use notegraph_parser::markdown::fenced_line_mask;
use regex::Regex;
use std::sync::LazyLock;

/// A marker run followed by whitespace; heading text may be empty
static BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#+)\s").expect("boundary regex"));

/// Location of a section within a list of body lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    /// Index of the heading line
    pub heading: usize,
    /// Index one past the last interior line
    pub end: usize,
    /// Heading level
    pub level: usize,
}

impl SectionBounds {
    /// Index of the first interior line
    pub fn interior_start(&self) -> usize {
        self.heading + 1
    }
}

/// Locate a section by heading.
///
/// `## Budget` matches a line equal to it after trimming. Plain `Budget`
/// matches a heading with that text at any level. The first match wins.
pub fn find_section(lines: &[&str], section: &str) -> Option<SectionBounds> {
    let wanted = section.trim();
    let fenced = fenced_line_mask(lines, false);
    let plain = if wanted.starts_with('#') {
        None
    } else {
        Some(Regex::new(&format!(r"^(#+)\s*{}\s*$", regex::escape(wanted))).ok()?)
    };

    let (heading, level) = lines.iter().enumerate().find_map(|(idx, line)| {
        if fenced[idx] {
            return None;
        }
        let trimmed = line.trim();
        match &plain {
            None if trimmed == wanted => Some((idx, leading_hashes(wanted))),
            None => None,
            Some(re) => re.captures(trimmed).map(|caps| (idx, caps[1].len())),
        }
    })?;

    let end = (heading + 1..lines.len())
        .find(|&idx| {
            !fenced[idx] && boundary_level(lines[idx]).is_some_and(|next| next <= level)
        })
        .unwrap_or(lines.len());

    Some(SectionBounds { heading, end, level })
}

/// Interior text with leading and trailing blank lines removed
pub fn section_text(lines: &[&str], bounds: &SectionBounds) -> String {
    let interior = &lines[bounds.interior_start()..bounds.end];
    let first = interior.iter().position(|l| !l.trim().is_empty());
    let last = interior.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => interior[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Insert `text` as the last line of the section, directly before the next
/// boundary heading or at the end of the text.
pub fn append_to_section(lines: &[&str], bounds: &SectionBounds, text: &str) -> String {
    let at = bounds.end;
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend_from_slice(&lines[..at]);
    out.push(text);
    out.extend_from_slice(&lines[at..]);
    out.join("\n")
}

/// Replace the interior, keeping the heading line verbatim.
pub fn replace_section(lines: &[&str], bounds: &SectionBounds, content: &str) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..bounds.interior_start()]);
    out.push(content);
    out.extend_from_slice(&lines[bounds.end..]);
    out.join("\n")
}

/// Remove the heading line and the interior.
pub fn remove_section(lines: &[&str], bounds: &SectionBounds) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..bounds.heading]);
    out.extend_from_slice(&lines[bounds.end..]);
    out.join("\n")
}

fn boundary_level(line: &str) -> Option<usize> {
    BOUNDARY_REGEX.captures(line).map(|caps| caps[1].len())
}

fn leading_hashes(heading: &str) -> usize {
    heading.chars().take_while(|c| *c == '#').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "# A\nX\n## B\nY\n# C\nZ";

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    fn read(text: &str, section: &str) -> Option<String> {
        let lines = lines(text);
        find_section(&lines, section).map(|b| section_text(&lines, &b))
    }

    #[test]
    fn test_subsections_belong_to_parent() {
        assert_eq!(read(BODY, "# A").unwrap(), "X\n## B\nY");
        assert_eq!(read(BODY, "## B").unwrap(), "Y");
    }

    #[test]
    fn test_last_section_runs_to_end() {
        assert_eq!(read(BODY, "# C").unwrap(), "Z");
    }

    #[test]
    fn test_plain_text_lookup() {
        let body = lines(BODY);
        let bounds = find_section(&body, "B").unwrap();
        assert_eq!(bounds.level, 2);
        assert_eq!(bounds.heading, 2);
    }

    #[test]
    fn test_marker_must_match_exactly() {
        assert!(read(BODY, "### B").is_none());
        assert!(read(BODY, "# Missing").is_none());
        assert!(read(BODY, "Missing").is_none());
    }

    #[test]
    fn test_plain_lookup_escapes_text() {
        let body = "# Cost (USD)\n10\n# Other";
        assert_eq!(read(body, "Cost (USD)").unwrap(), "10");
        assert!(read(body, "Cost .USD.").is_none());
    }

    #[test]
    fn test_fenced_headings_do_not_end_section() {
        let body = "## Script\n```bash\n# not a heading\n```\ndone\n## Next";
        assert_eq!(read(body, "## Script").unwrap(), "```bash\n# not a heading\n```\ndone");
        assert!(read(body, "# not a heading").is_none());
    }

    #[test]
    fn test_bare_marker_ends_section() {
        assert_eq!(read("## S\nx\n## \ny", "## S").unwrap(), "x");
        assert_eq!(read("## S\nx\n#\ty", "## S").unwrap(), "x");
        assert_eq!(read("## S\nx\n##nospace\ny", "## S").unwrap(), "x\n##nospace\ny");
    }

    #[test]
    fn test_read_trims_blank_lines_only() {
        let body = "## S\n\n  indented\n\n## T";
        assert_eq!(read(body, "## S").unwrap(), "  indented");
    }

    #[test]
    fn test_append_goes_right_before_next_heading() {
        let body = lines("## S\nfirst\n\n## T\nt");
        let bounds = find_section(&body, "## S").unwrap();
        assert_eq!(append_to_section(&body, &bounds, "second"), "## S\nfirst\n\nsecond\n## T\nt");
    }

    #[test]
    fn test_append_to_empty_section() {
        let body = lines("## S\n## T");
        let bounds = find_section(&body, "## S").unwrap();
        assert_eq!(append_to_section(&body, &bounds, "new"), "## S\nnew\n## T");
    }

    #[test]
    fn test_append_to_last_section() {
        let body = lines("# A\nx");
        let bounds = find_section(&body, "# A").unwrap();
        assert_eq!(append_to_section(&body, &bounds, "y"), "# A\nx\ny");
    }

    #[test]
    fn test_replace_keeps_heading() {
        let body = lines(BODY);
        let bounds = find_section(&body, "# A").unwrap();
        assert_eq!(replace_section(&body, &bounds, "new"), "# A\nnew\n# C\nZ");
    }

    #[test]
    fn test_remove_drops_heading_and_interior() {
        let body = lines(BODY);
        let bounds = find_section(&body, "## B").unwrap();
        assert_eq!(remove_section(&body, &bounds), "# A\nX\n# C\nZ");
    }
}
