//! Parsing for notegraph vault files
//!
//! Turns the raw text of a markdown note into frontmatter, body, outgoing
//! wikilinks and tags, and exposes the line-level helpers (fences, headings)
//! that the validator and section editor build on.

pub mod error;
pub mod frontmatter;
pub mod markdown;
pub mod note;
pub mod wikilinks;

pub use error::{ParseError, ParseResult};
pub use frontmatter::{extract_tags, normalize, parse_frontmatter, serialize_note, split_frontmatter};
pub use markdown::{headings, parse_heading, scan_fences, FenceBlock, Heading};
pub use note::{parse_note, ParsedNote};
pub use wikilinks::{extract_wikilinks, outgoing_links, rewrite_links, TextEdit, Wikilink};
