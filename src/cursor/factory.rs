//! Builds scored cursor layers from a parsed [`crate::query::Query`] and an
//! index backend, computing the pair metadata (`low_max_score`,
//! `high_list_len`, duplicate detection) each layer needs.
//!
//! Grounded in the `make_max_scored_cursors`, `make_block_max_scored_cursors`
//! and `make_scored_paired_cursors` factories of
//! `original_source/pisa-decomposition/include/pisa/cursor/*.hpp`.

use crate::cursor::block_max_scored::BlockMaxScoredCursor;
use crate::cursor::contracts::{BlockMaxEnumerator, PostingCursor};
use crate::cursor::max_scored::MaxScoredCursor;
use crate::cursor::paired::PairedCursor;
use crate::cursor::scored::ScoredCursor;
use crate::query::Query;
use crate::scorer::{Scorer, TermScorer};
use crate::types::{Score, TermId};

/// Everything an index backend must expose to build cursors for a query term.
pub trait CursorSource<S: Scorer> {
    type Cursor: PostingCursor;
    type BlockMax: BlockMaxEnumerator;

    fn open_cursor(&self, term: TermId) -> Self::Cursor;
    fn open_block_max(&self, term: TermId) -> Self::BlockMax;
    fn max_score(&self, term: TermId) -> Score;
    fn scorer(&self) -> &S;
}

/// Build one [`MaxScoredCursor`] per query term.
///
/// For each `paired_terms` entry `(idx_a, idx_b)`, the longer list's
/// max-score becomes both sides' `low_max_score` (mirrors the source
/// choosing `index[idx_one].size() < index[idx_two].size()` to pick the
/// "longer" side), and `high_list_len` is `min(size, other_size)` over the
/// two opened cursors. A `duplicate` pair (`idx_a == idx_b`, from a lone
/// HIGH or LOW term) zeroes `high_list_len` via [`MaxScoredCursor::new`],
/// disabling priming for it.
pub fn build_max_scored_cursors<'s, Src, S>(
    query: &Query,
    source: &'s Src,
) -> Vec<MaxScoredCursor<'s, Src::Cursor, S>>
where
    Src: CursorSource<S>,
    S: Scorer,
{
    let mut out = Vec::with_capacity(query.terms.len());
    for (pos, &term) in query.terms.iter().enumerate() {
        let weight = query.term_weights[pos];
        let cursor = source.open_cursor(term);
        let size = cursor.size();
        let max_score = source.max_score(term);
        let scorer = TermScorer::new(source.scorer(), term, weight);

        let mut low_max_score = max_score;
        let mut high_list_len = size;
        let mut pair_id = pos as u32;
        let mut is_duplicate = true;

        for &(idx_a, idx_b, pid) in &query.paired_terms {
            if idx_a != pos && idx_b != pos {
                continue;
            }
            pair_id = pid;
            is_duplicate = idx_a == idx_b;
            let other = if idx_a == pos { idx_b } else { idx_a };
            let other_term = query.terms[other];
            let other_size = {
                // Only the size is needed to pick the longer side; opening a
                // second cursor just to measure it would be wasteful, but
                // the contract only exposes size via an open cursor.
                source.open_cursor(other_term).size()
            };
            high_list_len = size.min(other_size);
            low_max_score = if size < other_size {
                source.max_score(other_term)
            } else {
                max_score
            };
            break;
        }

        out.push(MaxScoredCursor::new(
            cursor,
            scorer,
            max_score,
            max_score,
            low_max_score,
            high_list_len,
            pair_id,
            is_duplicate,
        ));
    }
    out
}

/// Like [`build_max_scored_cursors`], but adds each cursor's block-max
/// enumerator, for BlockMaxWAND.
pub fn build_block_max_scored_cursors<'s, Src, S>(
    query: &Query,
    source: &'s Src,
) -> Vec<BlockMaxScoredCursor<'s, Src::Cursor, S, Src::BlockMax>>
where
    Src: CursorSource<S>,
    S: Scorer,
{
    let mut out = Vec::with_capacity(query.terms.len());
    for (pos, &term) in query.terms.iter().enumerate() {
        let weight = query.term_weights[pos];
        let cursor = source.open_cursor(term);
        let size = cursor.size();
        let wdata = source.open_block_max(term);
        let max_score = source.max_score(term);
        let scorer = TermScorer::new(source.scorer(), term, weight);

        let mut low_max_score = max_score;
        let mut high_list_len = size;
        let mut pair_id = pos as u32;
        let mut is_duplicate = true;

        for &(idx_a, idx_b, pid) in &query.paired_terms {
            if idx_a != pos && idx_b != pos {
                continue;
            }
            pair_id = pid;
            is_duplicate = idx_a == idx_b;
            let other = if idx_a == pos { idx_b } else { idx_a };
            let other_term = query.terms[other];
            let other_size = source.open_cursor(other_term).size();
            high_list_len = size.min(other_size);
            low_max_score = if size < other_size {
                source.max_score(other_term)
            } else {
                max_score
            };
            break;
        }

        out.push(BlockMaxScoredCursor::new(
            cursor,
            scorer,
            max_score,
            wdata,
            max_score,
            low_max_score,
            high_list_len,
            pair_id,
            is_duplicate,
        ));
    }
    out
}

/// Build one fused [`PairedCursor`] per entry of `query.paired_terms`. Unlike
/// [`build_max_scored_cursors`], this always produces exactly one cursor per
/// logical term (HIGH and LOW fused together), so the pivot-level bitmap
/// dedup used by plain/pair-aware WAND is unnecessary for callers that use
/// this layer (`SPEC_FULL.md` §4.8).
pub fn build_paired_cursors<'s, Src, S>(
    query: &Query,
    source: &'s Src,
) -> Vec<PairedCursor<'s, Src::Cursor, S>>
where
    Src: CursorSource<S>,
    S: Scorer,
{
    let mut out = Vec::with_capacity(query.paired_terms.len());
    for &(idx_a, idx_b, _pid) in &query.paired_terms {
        let same = idx_a == idx_b;
        let term_a = query.terms[idx_a];
        let term_b = query.terms[idx_b];
        let weight_a = query.term_weights[idx_a];
        let weight_b = query.term_weights[idx_b];

        let cursor_a = source.open_cursor(term_a);
        let size_a = cursor_a.size();
        let max_a = source.max_score(term_a);
        let scorer_a = TermScorer::new(source.scorer(), term_a, weight_a);
        let scored_a = ScoredCursor::new(cursor_a, scorer_a);

        let cursor_b = source.open_cursor(term_b);
        let size_b = cursor_b.size();
        let max_b = source.max_score(term_b);
        let scorer_b = TermScorer::new(source.scorer(), term_b, weight_b);
        let scored_b = ScoredCursor::new(cursor_b, scorer_b);

        let high_list_len = if same { 0 } else { size_a.min(size_b) };

        out.push(PairedCursor::new(
            scored_a,
            scored_b,
            max_a,
            max_b,
            same,
            high_list_len,
        ));
    }
    out
}
