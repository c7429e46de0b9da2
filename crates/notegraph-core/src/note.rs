//! Indexed note snapshot

use notegraph_parser::frontmatter::get_str;
use notegraph_parser::ParsedNote;
use serde::Serialize;
use serde_yaml::Mapping;
use std::path::PathBuf;

/// Frontmatter field read by instruction-note rules and the context block
pub const DESCRIPTION_KEY: &str = "description";

/// An immutable parsed note as held by the index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// File stem; unique and case-sensitive
    pub name: String,
    /// Absolute path of the backing file
    pub path: PathBuf,
    pub frontmatter: Mapping,
    pub body: String,
    /// Link targets in body order, not deduplicated
    pub outgoing_links: Vec<String>,
    pub tags: Vec<String>,
}

impl Note {
    pub fn from_parsed(name: impl Into<String>, path: impl Into<PathBuf>, parsed: ParsedNote) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            frontmatter: parsed.frontmatter,
            body: parsed.body,
            outgoing_links: parsed.outgoing_links,
            tags: parsed.tags,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Non-empty `description` frontmatter value
    pub fn description(&self) -> Option<&str> {
        get_str(&self.frontmatter, DESCRIPTION_KEY)
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegraph_parser::parse_note;

    #[test]
    fn test_description_ignores_blank_values() {
        let parsed = parse_note("---\ndescription: \"  \"\n---\nbody").unwrap();
        let note = Note::from_parsed("A", "/v/A.md", parsed);
        assert_eq!(note.description(), None);

        let parsed = parse_note("---\ndescription: Read before planning\n---\n").unwrap();
        let note = Note::from_parsed("B", "/v/B.md", parsed);
        assert_eq!(note.description(), Some("Read before planning"));
    }

    #[test]
    fn test_has_tag_is_exact() {
        let parsed = parse_note("---\ntags: [vc/project]\n---\n").unwrap();
        let note = Note::from_parsed("A", "/v/A.md", parsed);
        assert!(note.has_tag("vc/project"));
        assert!(!note.has_tag("vc"));
    }
}
