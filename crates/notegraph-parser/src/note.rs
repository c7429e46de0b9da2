//! Raw note text to structured note

use crate::error::ParseResult;
use crate::frontmatter::{extract_tags, normalize, parse_frontmatter, split_frontmatter};
use crate::wikilinks::outgoing_links;
use serde_yaml::Mapping;

/// The structured content of one note file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedNote {
    /// Frontmatter in insertion order, empty when absent
    pub frontmatter: Mapping,
    /// Text after the frontmatter block
    pub body: String,
    /// Link targets found in the body, in order, not deduplicated
    pub outgoing_links: Vec<String>,
    /// Tags from the `tags` frontmatter field
    pub tags: Vec<String>,
}

/// Parse the full text of a note file.
pub fn parse_note(raw: &str) -> ParseResult<ParsedNote> {
    let text = normalize(raw);
    let (yaml, body) = split_frontmatter(&text);
    let frontmatter = match yaml {
        Some(yaml) => parse_frontmatter(yaml)?,
        None => Mapping::new(),
    };

    Ok(ParsedNote {
        tags: extract_tags(&frontmatter),
        outgoing_links: outgoing_links(body),
        body: body.to_string(),
        frontmatter,
    })
}
