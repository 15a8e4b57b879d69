//! The capability traits the pruning algorithms (`crate::algorithms`) are
//! generic over. `spec.md` §9: "a target implementation should use an
//! interface/capability abstraction... avoid virtual dispatch on hot inner
//! loops" — so algorithms are monomorphized over a concrete cursor type `T:
//! PivotCursor` (+ the optional capability traits below) rather than
//! storing `Box<dyn PivotCursor>`.

use crate::types::{DocId, Score};

/// Minimal capability every cursor used in a pivot-based pruning loop must
/// provide.
pub trait PivotCursor {
    fn docid(&self) -> DocId;
    fn next(&mut self);
    fn next_geq(&mut self, docid: DocId);
    /// The true contribution of the current document. Read-only: computing
    /// a score never advances the cursor.
    fn score(&self) -> Score;
    /// Upper bound on any contribution this cursor (or, for a fused
    /// [`crate::cursor::PairedCursor`], its currently active side) can make.
    fn max_score(&self) -> Score;
    /// Number of postings backing this cursor (both sides summed, for a
    /// fused cursor), used by MaxScore's length-based ordering.
    fn size(&self) -> usize;
    /// The query-term weight this cursor was built with.
    fn query_weight(&self) -> Score;
}

/// Cursors that can report a sound initial top-k threshold derived from
/// HIGH/LOW list-length guarantees (`spec.md` §4.7).
pub trait SafeThreshold: PivotCursor {
    fn safe_threshold(&self, k: usize) -> Score;
}

/// Cursors tagged with a logical-term pair id, for pivot-level HIGH/LOW
/// upper-bound deduplication (`spec.md` §4.4).
pub trait PairAware: PivotCursor {
    /// Identifies the logical term a HIGH/LOW pair of cursors share.
    fn pair_id(&self) -> u64;
    /// The smaller of the pair's two max-scores; subtracted from the pivot
    /// upper bound the second time a pair-id is seen, converting
    /// `max_a + max_b` into `max(max_a, max_b)`.
    fn low_max_score(&self) -> Score;
}

/// Cursors with a block-max enumerator for a tighter per-block bound
/// (`spec.md` §4.5).
pub trait BlockMax: PivotCursor {
    fn block_max_score(&mut self) -> Score;
    fn block_max_docid(&mut self) -> DocId;
    fn block_max_next_geq(&mut self, docid: DocId);
    fn block_max_reset(&mut self);
}

/// Fused HIGH/LOW cursors (`crate::cursor::PairedCursor`) additionally
/// expose the still-unvisited HIGH-side docid, used by the fused-cursor
/// pair WAND algorithm (`spec.md` §4.8 in `SPEC_FULL.md`) to decide whether
/// skipping past it was safe.
pub trait PairedDocid: PivotCursor {
    fn non_considered_high_docid(&self) -> DocId;
}
