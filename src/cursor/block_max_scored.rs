//! `BlockMaxScoredCursor`: further adds a block-max enumerator for tighter
//! per-block upper bounds (`spec.md` §2 component 4, §4.2).
//!
//! Grounded in `original_source/pisa-decomposition/include/pisa/cursor/block_max_scored_cursor.hpp`.

use crate::cursor::contracts::{BlockMaxEnumerator, PostingCursor};
use crate::cursor::max_scored::MaxScoredCursor;
use crate::cursor::pivot::{BlockMax, PairAware, PivotCursor, SafeThreshold};
use crate::scorer::{Scorer, TermScorer};
use crate::types::{DocId, Score};

pub struct BlockMaxScoredCursor<'s, C: PostingCursor, S: Scorer, B: BlockMaxEnumerator> {
    base: MaxScoredCursor<'s, C, S>,
    wdata: B,
}

impl<'s, C: PostingCursor, S: Scorer, B: BlockMaxEnumerator> BlockMaxScoredCursor<'s, C, S, B> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cursor: C,
        scorer: TermScorer<'s, S>,
        max_score: Score,
        wdata: B,
        paired_max_score: Score,
        low_max_score: Score,
        high_list_len: usize,
        pair_id: u32,
        is_duplicate: bool,
    ) -> Self {
        Self {
            base: MaxScoredCursor::new(
                cursor,
                scorer,
                max_score,
                paired_max_score,
                low_max_score,
                high_list_len,
                pair_id,
                is_duplicate,
            ),
            wdata,
        }
    }
}

impl<'s, C: PostingCursor, S: Scorer, B: BlockMaxEnumerator> PivotCursor
    for BlockMaxScoredCursor<'s, C, S, B>
{
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
        self.base.max_score()
    }

    fn size(&self) -> usize {
        self.base.size()
    }

    fn query_weight(&self) -> Score {
        self.base.query_weight()
    }
}

impl<'s, C: PostingCursor, S: Scorer, B: BlockMaxEnumerator> SafeThreshold
    for BlockMaxScoredCursor<'s, C, S, B>
{
    fn safe_threshold(&self, k: usize) -> Score {
        self.base.safe_threshold(k)
    }
}

impl<'s, C: PostingCursor, S: Scorer, B: BlockMaxEnumerator> PairAware
    for BlockMaxScoredCursor<'s, C, S, B>
{
    fn pair_id(&self) -> u64 {
        self.base.pair_id()
    }

    fn low_max_score(&self) -> Score {
        self.base.low_max_score()
    }
}

impl<'s, C: PostingCursor, S: Scorer, B: BlockMaxEnumerator> BlockMax
    for BlockMaxScoredCursor<'s, C, S, B>
{
    fn block_max_score(&mut self) -> Score {
        self.wdata.score()
    }

    fn block_max_docid(&mut self) -> DocId {
        self.wdata.docid()
    }

    fn block_max_next_geq(&mut self, docid: DocId) {
        self.wdata.next_geq(docid);
    }

    fn block_max_reset(&mut self) {
        self.wdata.reset();
    }
}
