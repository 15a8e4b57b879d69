//! Top-k disjunctive query evaluation algorithms (`spec.md` §4). Each
//! algorithm is generic over the cursor capability traits it needs
//! (`crate::cursor::pivot`), monomorphized per call site rather than
//! dispatched through a trait object.

pub mod bmw;
pub mod maxscore;
pub mod priming;
pub mod wand;
pub mod wand_pair;

pub use bmw::{block_max_wand, pair_aware_block_max_wand};
pub use maxscore::{high_then_low, length_sorted_maxscore, maxscore, pair_aware_maxscore};
pub use priming::prime_heap;
pub use wand::{pair_aware_wand, wand};
pub use wand_pair::wand_pair;
