use super::Operations;
use crate::error::{VaultError, VaultResult};
use crate::note::Note;
use crate::results::{BrokenLink, LinkDirection, LinksResult, NoteList, SearchResult};
use crate::tags::{matches_query, parse_tag_query, TagLogic};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// How a search query is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Exact, case-sensitive name
    #[default]
    Name,
    /// Case-insensitive substring of the name
    NamePartial,
    /// Case-insensitive substring of the body
    Content,
    /// One or more comma-separated tags, hierarchical prefix match
    Tag,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NamePartial => "name_partial",
            Self::Content => "content",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "name_partial" => Ok(Self::NamePartial),
            "content" => Ok(Self::Content),
            "tag" => Ok(Self::Tag),
            other => Err(VaultError::invalid_input(format!(
                "Invalid search mode: {other}. Valid: name, name_partial, content, tag"
            ))),
        }
    }
}

impl Operations {
    /// Find notes matching `query`. Results are sorted by name.
    ///
    /// `tag_logic` only affects [`SearchMode::Tag`].
    pub fn search(&self, query: &str, mode: SearchMode, tag_logic: TagLogic) -> VaultResult<Vec<SearchResult>> {
        let notes = self.vault.list_notes()?;
        let lowered = query.to_lowercase();
        let tag_queries = parse_tag_query(query);

        let matcher = |note: &Arc<Note>| match mode {
            SearchMode::Name => note.name == query,
            SearchMode::NamePartial => note.name.to_lowercase().contains(&lowered),
            SearchMode::Content => note.body.to_lowercase().contains(&lowered),
            SearchMode::Tag => matches_query(&note.tags, &tag_queries, tag_logic),
        };

        let mut results: Vec<SearchResult> = notes
            .iter()
            .filter(|note| matcher(note))
            .map(|note| SearchResult {
                name: note.name.clone(),
                path: note.path.clone(),
            })
            .collect();
        results.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(%mode, query = %query, hits = results.len(), "search");
        Ok(results)
    }

    /// Outgoing and/or incoming links of a note.
    pub fn links(&self, name: &str, direction: LinkDirection) -> VaultResult<LinksResult> {
        let note = self.vault.get(name)?;
        let outgoing = matches!(direction, LinkDirection::Out | LinkDirection::Both)
            .then(|| note.outgoing_links.clone());
        let incoming = match direction {
            LinkDirection::In | LinkDirection::Both => Some(self.vault.incoming_links(name)?),
            LinkDirection::Out => None,
        };

        Ok(LinksResult {
            name: note.name.clone(),
            outgoing,
            incoming,
        })
    }

    /// Every link whose target note does not exist, sorted.
    pub fn find_broken_links(&self) -> VaultResult<Vec<BrokenLink>> {
        let index = self.vault.index()?;
        let mut broken: Vec<BrokenLink> = index
            .notes()
            .flat_map(|note| {
                note.outgoing_links
                    .iter()
                    .filter(|target| !index.contains(target))
                    .map(|target| BrokenLink {
                        source: note.name.clone(),
                        target: target.clone(),
                    })
            })
            .collect();
        broken.sort();
        broken.dedup();
        Ok(broken)
    }

    /// A page of note names sorted alphabetically.
    pub fn list_notes(&self, limit: Option<usize>, offset: usize) -> VaultResult<NoteList> {
        let mut names: Vec<String> = self
            .vault
            .list_notes()?
            .iter()
            .map(|note| note.name.clone())
            .collect();
        names.sort();

        let total = names.len();
        let page = names
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        Ok(NoteList {
            notes: page,
            total,
            offset,
            limit,
        })
    }
}
