//! The cursor abstraction stack (`spec.md` §2 component 4, §3, §4.2):
//! [`PostingCursor`] (raw) → [`ScoredCursor`] (+ weight/score) →
//! [`MaxScoredCursor`] (+ upper bound, pair metadata) →
//! [`BlockMaxScoredCursor`] (+ block-max enumerator); plus the fused
//! [`PairedCursor`] used by the fused-cursor pair WAND variant.

pub mod block_max_scored;
pub mod contracts;
pub mod factory;
pub mod max_scored;
pub mod paired;
pub mod pivot;
pub mod scored;

pub use block_max_scored::BlockMaxScoredCursor;
pub use contracts::{BlockMaxEnumerator, PostingCursor};
pub use factory::{
    build_block_max_scored_cursors, build_max_scored_cursors, build_paired_cursors, CursorSource,
};
pub use max_scored::MaxScoredCursor;
pub use paired::PairedCursor;
pub use pivot::{BlockMax, PairAware, PairedDocid, PivotCursor, SafeThreshold};
pub use scored::ScoredCursor;
