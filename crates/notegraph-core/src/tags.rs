//! Tag governance and tag matching
//!
//! New tag values are only accepted when some note already uses them. On top
//! of that, individual tags can carry structural rules, kept as data in a
//! [`TagPolicy`] table keyed by tag name.

use crate::error::{VaultError, VaultResult};
use crate::note::DESCRIPTION_KEY;
use notegraph_parser::frontmatter::get_str;
use serde::Serialize;
use serde_yaml::Mapping;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Tag reserved for people notes
pub const PERSON_TAG: &str = "Person";

/// Tag marking notes with instructions for the assistant
pub const INSTRUCTIONS_TAG: &str = "claude";

/// Separator between levels of a hierarchical tag
pub const TAG_SEPARATOR: char = '/';

/// A structural rule attached to one tag
#[derive(Clone, Copy)]
pub struct TagRule {
    /// Passes when the note may carry the tag
    pub check: fn(name: &str, frontmatter: &Mapping) -> bool,
    /// Error shown when `check` fails
    pub message: &'static str,
}

impl fmt::Debug for TagRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRule").field("message", &self.message).finish()
    }
}

fn is_person_note(name: &str, _frontmatter: &Mapping) -> bool {
    name.starts_with('@')
}

fn has_description(_name: &str, frontmatter: &Mapping) -> bool {
    get_str(frontmatter, DESCRIPTION_KEY).is_some_and(|d| !d.trim().is_empty())
}

/// Vocabulary check plus per-tag rules
#[derive(Debug, Clone)]
pub struct TagPolicy {
    rules: HashMap<String, TagRule>,
}

impl Default for TagPolicy {
    fn default() -> Self {
        Self::empty()
            .with_rule(
                PERSON_TAG,
                TagRule {
                    check: is_person_note,
                    message: "Tag 'Person' is for people notes only. Note name must start with '@' (e.g. '@John Doe').",
                },
            )
            .with_rule(
                INSTRUCTIONS_TAG,
                TagRule {
                    check: has_description,
                    message: "Tag 'claude' marks instructions for Claude AI. Requires 'description' field in frontmatter explaining when to read the note.",
                },
            )
    }
}

impl TagPolicy {
    /// A policy with no per-tag rules
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, tag: impl Into<String>, rule: TagRule) -> Self {
        self.rules.insert(tag.into(), rule);
        self
    }

    pub fn rule(&self, tag: &str) -> Option<&TagRule> {
        self.rules.get(tag)
    }

    /// Reject any proposed tag not already in `vocabulary`.
    pub fn check_vocabulary(&self, proposed: &[String], vocabulary: &BTreeSet<String>) -> VaultResult<()> {
        let invalid: Vec<&str> = proposed
            .iter()
            .filter(|tag| !vocabulary.contains(tag.as_str()))
            .map(String::as_str)
            .collect();
        if invalid.is_empty() {
            return Ok(());
        }

        let allowed: Vec<&str> = vocabulary.iter().map(String::as_str).collect();
        Err(VaultError::PolicyViolation(format!(
            "Tags not in allowed list: {invalid:?}. Allowed: {allowed:?}. Ask user before creating new tags."
        )))
    }

    /// Run the structural rule of every governed tag in `tags`.
    pub fn check_rules(&self, tags: &[String], name: &str, frontmatter: &Mapping) -> VaultResult<()> {
        for tag in tags {
            if let Some(rule) = self.rules.get(tag) {
                if !(rule.check)(name, frontmatter) {
                    return Err(VaultError::PolicyViolation(rule.message.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Vocabulary first, then rules.
    pub fn check(
        &self,
        proposed: &[String],
        vocabulary: &BTreeSet<String>,
        name: &str,
        frontmatter: &Mapping,
    ) -> VaultResult<()> {
        self.check_vocabulary(proposed, vocabulary)?;
        self.check_rules(proposed, name, frontmatter)
    }
}

/// Whether `tag` satisfies the query `query`.
///
/// `vc` matches `vc` and `vc/project/x`, but not `vcx`.
pub fn tag_matches(tag: &str, query: &str) -> bool {
    match tag.strip_prefix(query) {
        Some("") => true,
        Some(rest) => rest.starts_with(TAG_SEPARATOR),
        None => false,
    }
}

/// How several queried tags combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagLogic {
    /// Any queried tag matches (`or`)
    #[default]
    Or,
    /// Every queried tag matches (`and`)
    And,
}

impl FromStr for TagLogic {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "or" => Ok(Self::Or),
            "and" => Ok(Self::And),
            other => Err(VaultError::invalid_input(format!(
                "Invalid tag_logic: {other}. Valid: and, or"
            ))),
        }
    }
}

/// Split a comma-separated tag query into trimmed, non-empty terms.
pub fn parse_tag_query(query: &str) -> Vec<&str> {
    query
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Whether a note's tags satisfy all or any of `queries`.
pub fn matches_query(tags: &[String], queries: &[&str], logic: TagLogic) -> bool {
    if queries.is_empty() {
        return false;
    }
    let hit = |query: &&str| tags.iter().any(|tag| tag_matches(tag, query));
    match logic {
        TagLogic::Or => queries.iter().any(hit),
        TagLogic::And => queries.iter().all(hit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegraph_parser::parse_frontmatter;

    fn vocab(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn owned(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_hierarchical_match() {
        assert!(tag_matches("vc/project", "vc"));
        assert!(tag_matches("vc/project/deep", "vc"));
        assert!(tag_matches("vc", "vc"));
        assert!(!tag_matches("vcx", "vc"));
        assert!(!tag_matches("vc", "vc/project"));
    }

    #[test]
    fn test_unknown_tag_rejected_with_vocabulary() {
        let err = TagPolicy::default()
            .check_vocabulary(&owned(&["career"]), &vocab(&["vc", "Person"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tags not in allowed list: [\"career\"]. Allowed: [\"Person\", \"vc\"]. Ask user before creating new tags."
        );
        assert_eq!(err.kind(), crate::error::ErrorKind::PolicyViolation);
    }

    #[test]
    fn test_known_tags_pass() {
        assert!(TagPolicy::default()
            .check_vocabulary(&owned(&["vc"]), &vocab(&["vc", "Person"]))
            .is_ok());
    }

    #[test]
    fn test_person_rule() {
        let policy = TagPolicy::default();
        let fm = Mapping::new();
        assert!(policy.check_rules(&owned(&["Person"]), "@Jane Roe", &fm).is_ok());
        let err = policy.check_rules(&owned(&["Person"]), "Jane Roe", &fm).unwrap_err();
        assert!(err.to_string().contains("must start with '@'"));
    }

    #[test]
    fn test_instructions_rule_requires_description() {
        let policy = TagPolicy::default();
        let without = parse_frontmatter("tags: [claude]").unwrap();
        assert!(policy.check_rules(&owned(&["claude"]), "Guide", &without).is_err());

        let with = parse_frontmatter("tags: [claude]\ndescription: Read when planning").unwrap();
        assert!(policy.check_rules(&owned(&["claude"]), "Guide", &with).is_ok());
    }

    #[test]
    fn test_rules_are_data() {
        fn never(_: &str, _: &Mapping) -> bool {
            false
        }
        let policy = TagPolicy::empty().with_rule(
            "locked",
            TagRule {
                check: never,
                message: "locked tag",
            },
        );
        let err = policy.check_rules(&owned(&["locked"]), "A", &Mapping::new()).unwrap_err();
        assert_eq!(err.to_string(), "locked tag");
        assert!(policy.rule("Person").is_none());
    }

    #[test]
    fn test_vocabulary_checked_before_rules() {
        let err = TagPolicy::default()
            .check(&owned(&["Person"]), &vocab(&["vc"]), "No Sigil", &Mapping::new())
            .unwrap_err();
        assert!(err.to_string().starts_with("Tags not in allowed list"));
    }

    #[test]
    fn test_tag_logic_parse() {
        assert_eq!("and".parse::<TagLogic>().unwrap(), TagLogic::And);
        assert_eq!("or".parse::<TagLogic>().unwrap(), TagLogic::Or);
        let err = "xor".parse::<TagLogic>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid tag_logic: xor. Valid: and, or");
    }

    #[test]
    fn test_matches_query() {
        let tags = owned(&["vc/project", "Person"]);
        let queries = parse_tag_query(" vc , Person ");
        assert_eq!(queries, vec!["vc", "Person"]);
        assert!(matches_query(&tags, &queries, TagLogic::And));
        assert!(matches_query(&tags, &["vc", "missing"], TagLogic::Or));
        assert!(!matches_query(&tags, &["vc", "missing"], TagLogic::And));
        assert!(!matches_query(&tags, &[], TagLogic::Or));
    }
}
