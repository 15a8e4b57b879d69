//! An in-memory reference backend implementing [`PostingCursor`] and
//! [`BlockMaxEnumerator`] over plain `Vec`s. Used by tests and by
//! `src/bin/query_eval.rs`'s small-scale demo mode; production deployments
//! plug in a memory-mapped backend behind the same traits (`spec.md` §3
//! "external collaborators").

use crate::cursor::{BlockMaxEnumerator, CursorSource, PostingCursor};
use crate::scorer::Scorer;
use crate::types::{DocId, Score, TermId};

/// A single term's postings, already sorted by ascending docid.
#[derive(Clone, Debug)]
pub struct PostingList {
    pub docids: Vec<DocId>,
    pub freqs: Vec<u32>,
}

impl PostingList {
    #[must_use]
    pub fn new(docids: Vec<DocId>, freqs: Vec<u32>) -> Self {
        assert_eq!(docids.len(), freqs.len(), "docids/freqs length mismatch");
        Self { docids, freqs }
    }
}

/// Cursor over a [`PostingList`], linear-scanning for `next_geq` (adequate
/// for the small lists exercised in tests; a real backend would binary- or
/// skip-search).
pub struct VecCursor {
    list: PostingList,
    pos: usize,
}

impl VecCursor {
    #[must_use]
    pub fn new(list: PostingList) -> Self {
        Self { list, pos: 0 }
    }
}

impl PostingCursor for VecCursor {
    fn docid(&self) -> DocId {
        self.list
            .docids
            .get(self.pos)
            .copied()
            .unwrap_or(DocId::MAX)
    }

    fn freq(&self) -> u32 {
        self.list.freqs.get(self.pos).copied().unwrap_or(0)
    }

    fn size(&self) -> usize {
        self.list.docids.len()
    }

    fn next(&mut self) {
        self.pos += 1;
    }

    fn next_geq(&mut self, docid: DocId) {
        while self.pos < self.list.docids.len() && self.list.docids[self.pos] < docid {
            self.pos += 1;
        }
    }

    fn reset(&mut self) {
        self.pos = 0;
    }
}

/// Fixed-size block-max enumerator: one score per `block_size` contiguous
/// docids.
pub struct VecBlockMax {
    block_size: usize,
    docids: Vec<DocId>,
    block_scores: Vec<Score>,
    block: usize,
}

impl VecBlockMax {
    #[must_use]
    pub fn new(docids: Vec<DocId>, block_scores: Vec<Score>, block_size: usize) -> Self {
        Self {
            block_size,
            docids,
            block_scores,
            block: 0,
        }
    }
}

impl BlockMaxEnumerator for VecBlockMax {
    fn docid(&self) -> DocId {
        let end = (self.block + 1) * self.block_size;
        self.docids
            .get(end.min(self.docids.len()).saturating_sub(1))
            .copied()
            .unwrap_or(DocId::MAX)
    }

    fn score(&self) -> f32 {
        self.block_scores.get(self.block).copied().unwrap_or(0.0)
    }

    fn next_geq(&mut self, docid: DocId) {
        while self.docid() < docid && self.block + 1 < self.block_scores.len() {
            self.block += 1;
        }
    }

    fn reset(&mut self) {
        self.block = 0;
    }
}

/// A small multi-term in-memory index: one [`PostingList`] and precomputed
/// `max_score` per term, keyed by [`TermId`].
pub struct MemoryIndex<S: Scorer> {
    lists: Vec<PostingList>,
    max_scores: Vec<Score>,
    block_size: usize,
    scorer: S,
}

impl<S: Scorer> MemoryIndex<S> {
    #[must_use]
    pub fn new(lists: Vec<PostingList>, max_scores: Vec<Score>, block_size: usize, scorer: S) -> Self {
        assert_eq!(lists.len(), max_scores.len());
        Self {
            lists,
            max_scores,
            block_size: block_size.max(1),
            scorer,
        }
    }

    #[must_use]
    pub fn num_docs(&self) -> DocId {
        self.lists
            .iter()
            .flat_map(|l| l.docids.last().copied())
            .max()
            .map_or(0, |d| d + 1)
    }
}

impl<S: Scorer> CursorSource<S> for MemoryIndex<S> {
    type Cursor = VecCursor;
    type BlockMax = VecBlockMax;

    fn open_cursor(&self, term: TermId) -> Self::Cursor {
        VecCursor::new(self.lists[term as usize].clone())
    }

    fn open_block_max(&self, term: TermId) -> Self::BlockMax {
        let list = &self.lists[term as usize];
        let mut block_scores = Vec::new();
        for (docid_chunk, freq_chunk) in list
            .docids
            .chunks(self.block_size)
            .zip(list.freqs.chunks(self.block_size))
        {
            let max = docid_chunk
                .iter()
                .zip(freq_chunk)
                .map(|(&d, &f)| self.scorer.score(term, d, f))
                .fold(0.0_f32, f32::max);
            block_scores.push(max);
        }
        VecBlockMax::new(list.docids.clone(), block_scores, self.block_size)
    }

    fn max_score(&self, term: TermId) -> Score {
        self.max_scores[term as usize]
    }

    fn scorer(&self) -> &S {
        &self.scorer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_cursor_next_geq_skips_forward() {
        let mut c = VecCursor::new(PostingList::new(vec![1, 4, 9, 20], vec![1, 1, 1, 1]));
        c.next_geq(5);
        assert_eq!(c.docid(), 9);
        c.next_geq(9);
        assert_eq!(c.docid(), 9);
        c.next_geq(21);
        assert_eq!(c.docid(), DocId::MAX);
    }

    #[test]
    fn vec_cursor_reset_returns_to_start() {
        let mut c = VecCursor::new(PostingList::new(vec![1, 4], vec![1, 1]));
        c.next();
        assert_eq!(c.docid(), 4);
        c.reset();
        assert_eq!(c.docid(), 1);
    }

    struct IdentityScorer;

    impl Scorer for IdentityScorer {
        fn score(&self, _term: TermId, _docid: DocId, freq: u32) -> Score {
            freq as f32
        }
    }

    #[test]
    fn block_max_enumerator_bounds_its_block() {
        let index = MemoryIndex::new(
            vec![PostingList::new(vec![1, 2, 3, 4, 5], vec![3, 1, 7, 2, 9])],
            vec![9.0],
            2,
            IdentityScorer,
        );
        let mut wdata = index.open_block_max(0);
        // Block 0 covers docids [1, 2] -> freqs [3, 1], max 3.
        assert_eq!(wdata.score(), 3.0);
        wdata.next_geq(3);
        // Block 1 covers [3, 4] -> freqs [7, 2], max 7.
        assert_eq!(wdata.score(), 7.0);
        wdata.next_geq(5);
        // Block 2 covers [5] -> freq 9.
        assert_eq!(wdata.score(), 9.0);
    }
}
