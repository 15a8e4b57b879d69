//! Bounded top-k min-heap with an externally primeable floor threshold.
//!
//! Grounded in `pisa::topk_queue` (referenced throughout
//! `original_source/pisa-decomposition/include/pisa/query/algorithm/*.hpp`
//! but not itself included in the retrieved source; its contract is fully
//! specified in `spec.md` §4.1 and reconstructed here). Tie-breaking policy
//! (`spec.md` §5 "Ordering guarantees") is fixed to **docid ascending**, one
//! of the two choices the spec permits; `topk_ties_break_by_docid_ascending`
//! below tests it explicitly.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::types::{DocId, Score};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    score: Score,
    docid: DocId,
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.docid.cmp(&other.docid))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded min-heap of `(score, docid)` pairs with capacity `k`.
#[derive(Debug, Clone)]
pub struct TopKQueue {
    capacity: usize,
    heap: BinaryHeap<Reverse<Entry>>,
    explicit_floor: Score,
}

impl TopKQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
            explicit_floor: 0.0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn heap_min(&self) -> Score {
        self.heap.peek().map_or(0.0, |Reverse(e)| e.score)
    }

    /// `threshold = max(explicit_floor, heap_min_if_full)`.
    #[must_use]
    pub fn threshold(&self) -> Score {
        if self.capacity > 0 && self.heap.len() == self.capacity {
            self.explicit_floor.max(self.heap_min())
        } else {
            self.explicit_floor
        }
    }

    /// True iff `score` strictly exceeds the current threshold. Cheap,
    /// no mutation.
    #[must_use]
    pub fn would_enter(&self, score: Score) -> bool {
        score > self.threshold()
    }

    /// Raises the explicit floor. Never lowers the effective threshold
    /// below the current heap minimum, since [`Self::threshold`] always
    /// takes the max of the explicit floor and the heap minimum.
    pub fn set_threshold(&mut self, t: Score) {
        if t > self.explicit_floor {
            self.explicit_floor = t;
        }
    }

    /// Attempts to insert `(score, docid)`. Returns whether the queue's
    /// contents changed.
    pub fn insert(&mut self, score: Score, docid: DocId) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            if !self.would_enter(score) {
                return false;
            }
            self.heap.push(Reverse(Entry { score, docid }));
            true
        } else if score > self.heap_min() {
            self.heap.pop();
            self.heap.push(Reverse(Entry { score, docid }));
            true
        } else {
            false
        }
    }

    /// Read-only, descending by score; ties broken by docid ascending.
    #[must_use]
    pub fn topk(&self) -> Vec<(Score, DocId)> {
        let mut entries: Vec<Entry> = self.heap.iter().map(|Reverse(e)| *e).collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.docid.cmp(&b.docid)));
        entries.into_iter().map(|e| (e.score, e.docid)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_up_to_capacity() {
        let mut q = TopKQueue::new(2);
        assert!(q.insert(1.0, 1));
        assert!(q.insert(2.0, 2));
        assert_eq!(q.len(), 2);
        assert_eq!(q.topk(), vec![(2.0, 2), (1.0, 1)]);
    }

    #[test]
    fn replaces_minimum_when_full() {
        let mut q = TopKQueue::new(2);
        q.insert(1.0, 1);
        q.insert(2.0, 2);
        assert!(q.insert(3.0, 3));
        assert_eq!(q.topk(), vec![(3.0, 3), (2.0, 2)]);
        assert!(!q.insert(0.5, 4), "below threshold must not enter");
    }

    #[test]
    fn would_enter_reflects_threshold() {
        let mut q = TopKQueue::new(1);
        assert!(q.would_enter(0.1));
        q.insert(5.0, 1);
        assert!(!q.would_enter(5.0), "ties do not strictly exceed threshold");
        assert!(q.would_enter(5.1));
    }

    #[test]
    fn set_threshold_primes_before_any_insert() {
        let mut q = TopKQueue::new(3);
        q.set_threshold(2.0);
        assert!(!q.insert(1.5, 1), "below primed floor");
        assert!(q.insert(2.5, 2));
    }

    #[test]
    fn set_threshold_never_lowers_effective_floor() {
        let mut q = TopKQueue::new(1);
        q.insert(10.0, 1);
        q.set_threshold(1.0); // lower than heap min, should be a no-op on threshold()
        assert_eq!(q.threshold(), 10.0);
    }

    #[test]
    fn topk_ties_break_by_docid_ascending() {
        let mut q = TopKQueue::new(3);
        q.insert(1.0, 5);
        q.insert(1.0, 2);
        q.insert(1.0, 9);
        assert_eq!(q.topk(), vec![(1.0, 2), (1.0, 5), (1.0, 9)]);
    }

    #[test]
    fn zero_capacity_queue_never_accepts() {
        let mut q = TopKQueue::new(0);
        assert!(!q.insert(100.0, 1));
        assert!(q.topk().is_empty());
    }
}
