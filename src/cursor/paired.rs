//! `PairedCursor`: fuses a logical term's HIGH and LOW cursors into one,
//! always exposing the smaller of the two underlying docids. Used by the
//! fused-cursor pair WAND algorithm (`SPEC_FULL.md` §4.8), which needs no
//! pivot-level bitmap because fusion makes dedup automatic.
//!
//! Grounded in
//! `original_source/pisa-decomposition/include/pisa/cursor/max_scored_paired_cursor.hpp`.

use crate::cursor::contracts::PostingCursor;
use crate::cursor::pivot::{PairedDocid, PivotCursor, SafeThreshold};
use crate::cursor::scored::ScoredCursor;
use crate::scorer::{Scorer, TermScorer};
use crate::types::{DocId, Score};

/// Which underlying cursor is currently active (closer to the front).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Side {
    High,
    Low,
}

pub struct PairedCursor<'s, C: PostingCursor, S: Scorer> {
    bases: [ScoredCursor<'s, C, S>; 2],
    max_scores: [Score; 2],
    current: Side,
    /// True when both sides were built from the same underlying list
    /// (degenerate pair: only HIGH or only LOW existed for this term).
    same: bool,
    high_list_len: usize,
}

impl<'s, C: PostingCursor, S: Scorer> PairedCursor<'s, C, S> {
    pub fn new(
        high: ScoredCursor<'s, C, S>,
        low: ScoredCursor<'s, C, S>,
        high_max_score: Score,
        low_max_score: Score,
        same: bool,
        high_list_len: usize,
    ) -> Self {
        let mut out = Self {
            bases: [high, low],
            max_scores: [high_max_score, low_max_score],
            current: Side::High,
            same,
            high_list_len,
        };
        out.select_current();
        out
    }

    fn idx(side: Side) -> usize {
        match side {
            Side::High => 0,
            Side::Low => 1,
        }
    }

    fn other(side: Side) -> Side {
        match side {
            Side::High => Side::Low,
            Side::Low => Side::High,
        }
    }

    /// After advancing one side, swap so `current` always names the side
    /// with the smaller docid (ties favour HIGH, matching the source's
    /// stable preference for the higher-impact side).
    fn select_current(&mut self) {
        if self.same {
            self.current = Side::High;
            return;
        }
        let high = self.bases[0].docid();
        let low = self.bases[1].docid();
        self.current = if low < high { Side::Low } else { Side::High };
    }

    #[must_use]
    pub fn freq(&self) -> u32 {
        self.bases[Self::idx(self.current)].freq()
    }

    pub fn next(&mut self) {
        let cur = Self::idx(self.current);
        self.bases[cur].next();
        if !self.same {
            self.select_current();
        }
    }

    pub fn next_geq(&mut self, docid: DocId) {
        if self.same {
            self.bases[0].next_geq(docid);
            return;
        }
        let cur = Self::idx(self.current);
        self.bases[cur].next_geq(docid);
        self.select_current();
    }

    pub fn reset(&mut self) {
        self.bases[0].reset();
        self.bases[1].reset();
        self.select_current();
    }
}

impl<'s, C: PostingCursor, S: Scorer> PivotCursor for PairedCursor<'s, C, S> {
    fn docid(&self) -> DocId {
        self.bases[Self::idx(self.current)].docid()
    }

    fn next(&mut self) {
        PairedCursor::next(self);
    }

    fn next_geq(&mut self, docid: DocId) {
        PairedCursor::next_geq(self, docid);
    }

    fn score(&self) -> Score {
        self.bases[Self::idx(self.current)].score()
    }

    /// The active side's own bound: HIGH contributes its larger bound while
    /// it leads, LOW its smaller bound while it leads, matching the source's
    /// `max_score()` (returns the currently-selected base's bound, not a sum).
    fn max_score(&self) -> Score {
        self.max_scores[Self::idx(self.current)]
    }

    fn size(&self) -> usize {
        if self.same {
            self.bases[0].size()
        } else {
            self.bases[0].size() + self.bases[1].size()
        }
    }

    fn query_weight(&self) -> Score {
        self.bases[Self::idx(self.current)].query_weight()
    }
}

impl<'s, C: PostingCursor, S: Scorer> SafeThreshold for PairedCursor<'s, C, S> {
    fn safe_threshold(&self, k: usize) -> Score {
        if self.same || k > self.high_list_len {
            0.0
        } else {
            self.max_scores[Self::idx(Side::Low)]
        }
    }
}

impl<'s, C: PostingCursor, S: Scorer> PairedDocid for PairedCursor<'s, C, S> {
    /// The LOW-side docid, still unvisited, whenever HIGH currently leads;
    /// `DocId::MAX` otherwise (nothing unconsidered, or lists are fused).
    fn non_considered_high_docid(&self) -> DocId {
        if self.same || self.current != Side::High {
            DocId::MAX
        } else {
            self.bases[Self::idx(Side::Low)].docid()
        }
    }
}
