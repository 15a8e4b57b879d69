//! `ScoredCursor`: wraps a raw posting-list cursor with a query-term weight
//! and a scorer closure (`spec.md` §2 component 4, §4.2).

use crate::cursor::contracts::PostingCursor;
use crate::scorer::{Scorer, TermScorer};
use crate::types::{DocId, Score};

pub struct ScoredCursor<'s, C: PostingCursor, S: Scorer> {
    cursor: C,
    scorer: TermScorer<'s, S>,
}

impl<'s, C: PostingCursor, S: Scorer> ScoredCursor<'s, C, S> {
    pub fn new(cursor: C, scorer: TermScorer<'s, S>) -> Self {
        Self { cursor, scorer }
    }

    #[must_use]
    pub fn docid(&self) -> DocId {
        self.cursor.docid()
    }

    #[must_use]
    pub fn freq(&self) -> u32 {
        self.cursor.freq()
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.scorer.apply(self.cursor.docid(), self.cursor.freq())
    }

    pub fn next(&mut self) {
        self.cursor.next();
    }

    pub fn next_geq(&mut self, docid: DocId) {
        self.cursor.next_geq(docid);
    }

    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.cursor.size()
    }

    #[must_use]
    pub fn query_weight(&self) -> Score {
        self.scorer.weight()
    }

    pub(crate) fn inner(&self) -> &C {
        &self.cursor
    }

    pub(crate) fn inner_mut(&mut self) -> &mut C {
        &mut self.cursor
    }
}
