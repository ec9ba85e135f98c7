//! Knowledge lookup for chat requests.
//!
//! Matching is plain bidirectional substring containment over the entry's
//! `question`. It is case-sensitive and has no ranking: the first entry in
//! base order that matches wins. Short questions such as "价格" will match
//! any query that mentions them, so false positives are expected.

use storepilot_core::knowledge::KnowledgeEntry;

/// Find the grounding entry for `query`.
///
/// An entry matches when the query contains its question or its question
/// contains the query. `None` means the reply is generated without grounding.
pub fn match_entry<'a>(query: &str, base: &'a [KnowledgeEntry]) -> Option<&'a KnowledgeEntry> {
    base.iter()
        .find(|entry| query.contains(entry.question.as_str()) || entry.question.contains(query))
}
