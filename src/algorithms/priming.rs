//! Threshold priming (`spec.md` §4.7): before scanning, seed the top-k heap
//! with a sound lower bound derived from the HIGH/LOW list-length
//! invariant, so a query that never fills its heap with true hits can still
//! prune using [`SafeThreshold::safe_threshold`].
//!
//! Grounded in the shared `prime_heap` helper in
//! `original_source/pisa-decomposition/include/pisa/query/algorithm/maxscore_query.hpp`
//! (also inlined at the top of `wand_query.hpp` and
//! `block_max_wand_query.hpp`).

use crate::cursor::SafeThreshold;
use crate::topk::TopKQueue;

/// Sets `topk`'s threshold to `max over cursors of cursor.safe_threshold(k)`,
/// where `k` is the queue's capacity. A no-op if the queue already holds a
/// tighter threshold (queue thresholds only ever tighten).
pub fn prime_heap<T: SafeThreshold>(cursors: &[T], topk: &mut TopKQueue) {
    let k = topk.capacity();
    let initial = cursors
        .iter()
        .map(|c| c.safe_threshold(k))
        .fold(0.0_f32, f32::max);
    if initial > 0.0 {
        topk.set_threshold(initial);
    }
}
