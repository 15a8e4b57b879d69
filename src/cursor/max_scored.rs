//! `MaxScoredCursor`: adds the term's global maximum contribution plus pair
//! metadata used for pivot-level dedup and threshold priming
//! (`spec.md` §2 component 4, §4.2).
//!
//! Grounded in `original_source/pisa-decomposition/include/pisa/cursor/max_scored_cursor.hpp`.
//! Per `SPEC_FULL.md` §9, the C++ source's overloaded `m_list_id` (used for
//! both "pair identifier" and "list identifier") is disambiguated here: the
//! field is `pair_id`, the accessor stays `list_id()` to match the cursor
//! contract name in `spec.md` §4.2.

use crate::cursor::contracts::PostingCursor;
use crate::cursor::pivot::{PairAware, PivotCursor, SafeThreshold};
use crate::cursor::scored::ScoredCursor;
use crate::scorer::{Scorer, TermScorer};
use crate::types::{DocId, Score};

pub struct MaxScoredCursor<'s, C: PostingCursor, S: Scorer> {
    base: ScoredCursor<'s, C, S>,
    max_score: Score,
    paired_max_score: Score,
    low_max_score: Score,
    /// Identifies the logical term a HIGH/LOW pair shares; see module docs.
    pair_id: u32,
    /// Length of the pair's shorter list, or 0 if this term is a duplicate
    /// singleton (no priming possible).
    high_list_len: usize,
}

impl<'s, C: PostingCursor, S: Scorer> MaxScoredCursor<'s, C, S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cursor: C,
        scorer: TermScorer<'s, S>,
        max_score: Score,
        paired_max_score: Score,
        low_max_score: Score,
        high_list_len: usize,
        pair_id: u32,
        is_duplicate: bool,
    ) -> Self {
        Self {
            base: ScoredCursor::new(cursor, scorer),
            max_score,
            paired_max_score,
            low_max_score,
            pair_id,
            // Ensure no threshold used if lists are the same.
            high_list_len: if is_duplicate { 0 } else { high_list_len },
        }
    }

    #[must_use]
    pub fn freq(&self) -> u32 {
        self.base.freq()
    }

    #[must_use]
    pub fn paired_max_score(&self) -> Score {
        self.paired_max_score
    }

    pub fn next(&mut self) {
        self.base.next();
    }

    pub fn next_geq(&mut self, docid: DocId) {
        self.base.next_geq(docid);
    }

    pub fn reset(&mut self) {
        self.base.reset();
    }

    pub(crate) fn base(&self) -> &ScoredCursor<'s, C, S> {
        &self.base
    }

    pub(crate) fn base_mut(&mut self) -> &mut ScoredCursor<'s, C, S> {
        &mut self.base
    }
}

impl<'s, C: PostingCursor, S: Scorer> PivotCursor for MaxScoredCursor<'s, C, S> {
    fn docid(&self) -> DocId {
        self.base.docid()
    }

    fn next(&mut self) {
        self.base.next();
    }

    fn next_geq(&mut self, docid: DocId) {
        self.base.next_geq(docid);
    }

    fn score(&self) -> Score {
        self.base.score()
    }

    fn max_score(&self) -> Score {
        self.max_score
    }

    fn size(&self) -> usize {
        self.base.size()
    }

    fn query_weight(&self) -> Score {
        self.base.query_weight()
    }
}

impl<'s, C: PostingCursor, S: Scorer> SafeThreshold for MaxScoredCursor<'s, C, S> {
    /// `k <= high_list_len` implies the shorter side of the pair has at
    /// least `k` documents, each also present (as the paired docid) in the
    /// longer list, so every top-k candidate accumulates score >= the
    /// longer list's max-weight (`low_max_score`); see `spec.md` §4.2.
    fn safe_threshold(&self, k: usize) -> Score {
        if k <= self.high_list_len {
            self.low_max_score
        } else {
            0.0
        }
    }
}

impl<'s, C: PostingCursor, S: Scorer> PairAware for MaxScoredCursor<'s, C, S> {
    fn pair_id(&self) -> u64 {
        u64::from(self.pair_id)
    }

    fn low_max_score(&self) -> Score {
        self.low_max_score
    }
}
