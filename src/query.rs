//! Query parsing (`spec.md` §3, §6): the `<id>:<tok_HIGH> <tok_LOW> ...` wire
//! format, HIGH/LOW pairing by stripped term prefix, and the HIGH-only/
//! LOW-only projections used by the `high_then_low` algorithm.
//!
//! Grounded in
//! `original_source/pisa-decomposition/include/pisa/query/queries.hpp` and
//! `src/query/queries.cpp`.

use std::collections::HashMap;

use itertools::Itertools;
use log::warn;

use crate::error::PruneqError;
use crate::types::{Score, TermId};

/// A parsed, pair-resolved query ready to build cursors from.
#[derive(Clone, Debug, Default)]
pub struct Query {
    pub id: Option<String>,
    /// Resolved term ids, in wire order.
    pub terms: Vec<TermId>,
    pub term_weights: Vec<Score>,
    /// True at position `i` when `terms[i]` is a HIGH-side term.
    pub is_high: Vec<bool>,
    /// `(idx_a, idx_b, pair_id)`. `idx_a == idx_b` marks a duplicated
    /// singleton (only one side of the pair existed in the index). The
    /// actual HIGH/LOW list lengths needed for priming are read off the
    /// opened cursors at cursor-build time, not carried here.
    pub paired_terms: Vec<(usize, usize, u32)>,
}

/// Resolves a token's stripped prefix and term id, and tells HIGH from LOW.
pub trait TermResolver {
    /// Looks up `token` (already known to end in `_HIGH` or `_LOW`) and
    /// returns its term id, or `None` if it's a stopword / unknown term.
    fn resolve(&self, token: &str) -> Option<TermId>;
}

/// Splits `raw` on a leading `id:` prefix, tokenizes the remainder on
/// whitespace, resolves and pairs terms. Every token must end in `_HIGH` or
/// `_LOW`; anything else is a [`PruneqError::MalformedQueryToken`].
/// Tokens a [`TermResolver`] can't resolve are dropped as stopwords (logged,
/// not fatal), matching the source's `spdlog::warn` + continue behaviour
/// rather than the source's `exit(EXIT_FAILURE)` on a malformed token.
pub fn parse_query(raw: &str, resolver: &impl TermResolver) -> Result<Query, PruneqError> {
    let (id, body) = match raw.split_once(':') {
        Some((id, rest)) => (Some(id.to_string()), rest),
        None => (None, raw),
    };

    // Collected by stripped prefix, preserving first-seen order so pairing
    // is deterministic across runs.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<(TermId, bool)>> = HashMap::new();

    for token in body.split_whitespace() {
        let (stem, is_high) = if let Some(stem) = token.strip_suffix("_HIGH") {
            (stem, true)
        } else if let Some(stem) = token.strip_suffix("_LOW") {
            (stem, false)
        } else {
            return Err(PruneqError::MalformedQueryToken {
                token: token.to_string(),
            });
        };

        let Some(term_id) = resolver.resolve(token) else {
            warn!("dropping unresolved query token: {token}");
            continue;
        };

        let entry = groups.entry(stem.to_string()).or_insert_with(|| {
            order.push(stem.to_string());
            Vec::new()
        });
        entry.push((term_id, is_high));
    }

    let mut terms = Vec::new();
    let mut is_high = Vec::new();
    let mut paired_terms = Vec::new();
    let mut next_pair_id = 0u32;

    for stem in order {
        let mut members = groups.remove(&stem).unwrap_or_default();
        if members.len() % 2 == 1 {
            warn!("odd HIGH/LOW count for term group `{stem}`, duplicating singleton");
            let dup = members[0];
            members.push(dup);
        }

        let unique_ids: std::collections::HashSet<TermId> =
            members.iter().map(|&(id, _)| id).collect();

        let base = terms.len();
        for &(term_id, high) in &members {
            terms.push(term_id);
            is_high.push(high);
        }

        let pair_id = next_pair_id;
        next_pair_id += 1;

        if unique_ids.len() == 1 {
            // Single physical term standing in for both sides: duplicate
            // pair, no priming.
            paired_terms.push((base, base, pair_id));
        } else {
            // members.len() == 2 here: one HIGH id, one LOW id.
            paired_terms.push((base, base + 1, pair_id));
        }
    }

    let term_weights = vec![1.0; terms.len()];

    Ok(Query {
        id,
        terms,
        term_weights,
        is_high,
        paired_terms,
    })
}

/// Deduplicated `(term_id, frequency)` pairs, sorted by term id (`spec.md`
/// §3's "OR" query frequency accounting).
#[must_use]
pub fn query_freqs(terms: &[TermId]) -> Vec<(TermId, u32)> {
    let mut sorted = terms.to_vec();
    sorted.sort_unstable();
    sorted
        .into_iter()
        .dedup_with_count()
        .map(|(count, term)| (term, count as u32))
        .collect()
}

/// The HIGH-side projection of a query: term ids at positions where
/// `is_high[i]` is true.
#[must_use]
pub fn get_high_query(query: &Query) -> Vec<TermId> {
    query
        .terms
        .iter()
        .zip(&query.is_high)
        .filter(|(_, &high)| high)
        .map(|(&t, _)| t)
        .collect()
}

/// The LOW-side projection of a query: term ids at positions where
/// `is_high[i]` is false.
#[must_use]
pub fn get_low_query(query: &Query) -> Vec<TermId> {
    query
        .terms
        .iter()
        .zip(&query.is_high)
        .filter(|(_, &high)| !high)
        .map(|(&t, _)| t)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapResolver(HashMap<&'static str, TermId>);

    impl TermResolver for MapResolver {
        fn resolve(&self, token: &str) -> Option<TermId> {
            self.0.get(token).copied()
        }
    }

    fn resolver() -> MapResolver {
        MapResolver(HashMap::from([
            ("cat_HIGH", 1),
            ("cat_LOW", 2),
            ("dog_HIGH", 3),
        ]))
    }

    #[test]
    fn pairs_high_and_low_by_stripped_prefix() {
        let q = parse_query("q1:cat_HIGH cat_LOW", &resolver()).unwrap();
        assert_eq!(q.id.as_deref(), Some("q1"));
        assert_eq!(q.terms, vec![1, 2]);
        assert_eq!(q.paired_terms, vec![(0, 1, 0)]);
    }

    #[test]
    fn lone_side_becomes_duplicate_pair() {
        let q = parse_query("dog_HIGH", &resolver()).unwrap();
        assert_eq!(q.terms, vec![3]);
        assert_eq!(q.paired_terms, vec![(0, 0, 0)]);
    }

    #[test]
    fn malformed_token_is_an_error() {
        let err = parse_query("cat_high", &resolver()).unwrap_err();
        assert!(matches!(err, PruneqError::MalformedQueryToken { .. }));
    }

    #[test]
    fn unresolved_token_is_dropped_not_fatal() {
        let q = parse_query("cat_HIGH ghost_HIGH", &resolver()).unwrap();
        assert_eq!(q.terms, vec![1]);
    }

    #[test]
    fn query_freqs_counts_duplicates() {
        assert_eq!(query_freqs(&[3, 1, 3, 2]), vec![(1, 1), (2, 1), (3, 2)]);
    }

    #[test]
    fn high_low_projections_split_by_flag() {
        let q = parse_query("cat_HIGH cat_LOW", &resolver()).unwrap();
        assert_eq!(get_high_query(&q), vec![1]);
        assert_eq!(get_low_query(&q), vec![2]);
    }
}
