//! WAND and pair-aware WAND (`spec.md` §4.3, §4.4).
//!
//! Grounded in
//! `original_source/pisa-decomposition/include/pisa/query/algorithm/wand_query.hpp`.

use crate::algorithms::priming::prime_heap;
use crate::bitset::PairBitset;
use crate::cursor::{PairAware, PivotCursor, SafeThreshold};
use crate::topk::TopKQueue;
use crate::types::DocId;

/// Scans backward from `pivot` to the nearest cursor whose docid differs
/// from `pivot_id`. `cursors[pivot]` is already at `pivot_id`, so advancing
/// it via `next_geq(pivot_id)` would be a no-op; the source instead advances
/// this distinct cursor, the farthest-left one still behind the pivot.
fn backward_distinct<T: PivotCursor>(cursors: &[T], pivot: usize, pivot_id: DocId) -> usize {
    let mut next_list = pivot;
    while cursors[next_list].docid() == pivot_id {
        next_list -= 1;
    }
    next_list
}

/// Bubbles `cursors[pos]` rightward past any cursor it now exceeds. Used
/// after `next_geq` on `cursors[pos]`, which can only increase its docid, so
/// re-insertion only ever needs to move forward.
fn bubble_forward<T: PivotCursor>(cursors: &mut [T], mut pos: usize) {
    while pos + 1 < cursors.len() && cursors[pos + 1].docid() < cursors[pos].docid() {
        cursors.swap(pos, pos + 1);
        pos += 1;
    }
}

/// Finds the first prefix `[0..=pivot]` whose summed `max_score()` would
/// enter `topk`, or `None` if no prefix (including the full list) would.
/// Cursors are assumed already sorted by ascending `docid()`.
fn find_pivot<T: PivotCursor>(
    cursors: &[T],
    topk: &TopKQueue,
    max_docid: DocId,
) -> Option<(usize, DocId)> {
    let mut upper_bound = 0.0;
    for (i, c) in cursors.iter().enumerate() {
        if c.docid() >= max_docid {
            return None;
        }
        upper_bound += c.max_score();
        if topk.would_enter(upper_bound) {
            return Some((i, c.docid()));
        }
    }
    None
}

/// Same pivot search, but subtracts the smaller side's bound the second
/// time a logical term's pair-id is seen in the prefix, turning
/// `max_high + max_low` into `max(max_high, max_low)` for terms whose both
/// sides are present among the candidate cursors (`spec.md` §4.4).
fn find_pivot_pair_aware<T: PivotCursor + PairAware>(
    cursors: &[T],
    topk: &TopKQueue,
    max_docid: DocId,
    seen: &mut PairBitset,
) -> Option<(usize, DocId)> {
    seen.clear();
    let mut upper_bound = 0.0;
    for (i, c) in cursors.iter().enumerate() {
        if c.docid() >= max_docid {
            return None;
        }
        upper_bound += c.max_score();
        let slot = c.pair_id() % 64;
        if seen.get(slot) {
            upper_bound -= c.low_max_score();
        } else {
            seen.set(slot, true);
        }
        if topk.would_enter(upper_bound) {
            return Some((i, c.docid()));
        }
    }
    None
}

/// Plain WAND (`spec.md` §4.3). `cursors` need not be pre-sorted; they are
/// sorted by docid in place before the main loop.
pub fn wand<T: PivotCursor + SafeThreshold>(
    cursors: &mut [T],
    max_docid: DocId,
    topk: &mut TopKQueue,
    prime: bool,
) {
    if cursors.is_empty() {
        return;
    }
    cursors.sort_by_key(PivotCursor::docid);
    if prime {
        prime_heap(cursors, topk);
    }

    loop {
        let Some((pivot, pivot_id)) = find_pivot(cursors, topk, max_docid) else {
            break;
        };
        if pivot_id == cursors[0].docid() {
            let mut score = 0.0;
            let mut tied = 0;
            for c in cursors.iter() {
                if c.docid() != pivot_id {
                    break;
                }
                score += c.score();
                tied += 1;
            }
            topk.insert(score, pivot_id);
            for c in &mut cursors[..tied] {
                c.next();
            }
            // Every cursor in the matched prefix moved by an arbitrary
            // amount; a single bubble can't restore order, so re-sort.
            cursors.sort_by_key(PivotCursor::docid);
        } else {
            let next_list = backward_distinct(cursors, pivot, pivot_id);
            cursors[next_list].next_geq(pivot_id);
            bubble_forward(cursors, next_list);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::algorithms::test_support::{brute_force_topk, build_index, query};
    use crate::cursor::build_max_scored_cursors;

    /// Collapses raw `(docid, freq)` pairs into a sorted, deduplicated
    /// posting list (later docid wins on a duplicate), the invariant every
    /// real posting list upholds.
    fn sorted_unique_postings(raw: Vec<(u32, u32)>) -> (Vec<DocId>, Vec<u32>) {
        let map: BTreeMap<DocId, u32> = raw.into_iter().map(|(d, f)| (d, f.max(1))).collect();
        map.into_iter().unzip()
    }

    proptest! {
        #[test]
        fn wand_matches_brute_force_on_random_postings(
            high_raw in proptest::collection::vec((1u32..60, 1u32..10), 0..12),
            low_raw in proptest::collection::vec((1u32..60, 1u32..10), 0..12),
        ) {
            let high = sorted_unique_postings(high_raw);
            let low = sorted_unique_postings(low_raw);
            let lists = vec![high, low];

            let names = ["cat_HIGH", "cat_LOW"];
            let index = build_index(&names, lists.clone());
            let q = query(&names, "cat_HIGH cat_LOW");
            let mut cursors = build_max_scored_cursors(&q, &index);
            let max_docid = lists
                .iter()
                .flat_map(|(d, _)| d.last().copied())
                .max()
                .map_or(0, |d| d + 1);

            let mut topk = TopKQueue::new(5);
            wand(&mut cursors, max_docid, &mut topk, false);

            let expected = brute_force_topk(&lists, &[0, 1], 5);
            prop_assert_eq!(topk.topk(), expected);
        }
    }

    #[test]
    fn wand_matches_brute_force_on_a_paired_term() {
        let names = ["cat_HIGH", "cat_LOW"];
        let lists = vec![
            (vec![2, 7, 9], vec![9, 4, 8]),
            (vec![1, 2, 4, 6, 9], vec![1, 2, 1, 3, 1]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW");
        let mut cursors = build_max_scored_cursors(&q, &index);
        let mut topk = TopKQueue::new(3);
        wand(&mut cursors, index_max_docid(&lists), &mut topk, false);

        let expected = brute_force_topk(&lists, &[0, 1], 3);
        assert_eq!(topk.topk(), expected);
    }

    #[test]
    fn wand_with_priming_matches_unprimed_topk() {
        let names = ["cat_HIGH", "cat_LOW"];
        let lists = vec![
            (vec![2, 7, 9], vec![9, 4, 8]),
            (vec![1, 2, 4, 6, 9], vec![1, 2, 1, 3, 1]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW");

        let mut unprimed = TopKQueue::new(2);
        let mut cursors = build_max_scored_cursors(&q, &index);
        wand(&mut cursors, index_max_docid(&lists), &mut unprimed, false);

        let mut primed = TopKQueue::new(2);
        let mut cursors = build_max_scored_cursors(&q, &index);
        wand(&mut cursors, index_max_docid(&lists), &mut primed, true);

        assert_eq!(unprimed.topk(), primed.topk());
    }

    #[test]
    fn pair_aware_wand_matches_plain_wand() {
        let names = ["cat_HIGH", "cat_LOW", "dog_HIGH", "dog_LOW"];
        let lists = vec![
            (vec![1, 5, 8], vec![5, 3, 7]),
            (vec![2, 5, 6, 9], vec![1, 2, 1, 1]),
            (vec![1, 2, 9], vec![6, 2, 9]),
            (vec![3, 5, 6, 8], vec![1, 1, 2, 1]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW dog_HIGH dog_LOW");

        let mut plain_topk = TopKQueue::new(3);
        let mut cursors = build_max_scored_cursors(&q, &index);
        wand(&mut cursors, index_max_docid(&lists), &mut plain_topk, false);

        let mut pair_topk = TopKQueue::new(3);
        let mut cursors = build_max_scored_cursors(&q, &index);
        pair_aware_wand(&mut cursors, index_max_docid(&lists), &mut pair_topk, false);

        assert_eq!(plain_topk.topk(), pair_topk.topk());
    }

    fn index_max_docid(lists: &[(Vec<DocId>, Vec<u32>)]) -> DocId {
        lists
            .iter()
            .flat_map(|(d, _)| d.last().copied())
            .max()
            .map_or(0, |d| d + 1)
    }
}

/// Pair-aware WAND (`spec.md` §4.4): identical to [`wand`] except the pivot
/// bound dedups a logical term's HIGH/LOW contribution via a pivot-local
/// bitmap cleared every scan.
pub fn pair_aware_wand<T: PivotCursor + SafeThreshold + PairAware>(
    cursors: &mut [T],
    max_docid: DocId,
    topk: &mut TopKQueue,
    prime: bool,
) {
    if cursors.is_empty() {
        return;
    }
    cursors.sort_by_key(PivotCursor::docid);
    if prime {
        prime_heap(cursors, topk);
    }
    let mut seen = PairBitset::new();

    loop {
        let Some((pivot, pivot_id)) = find_pivot_pair_aware(cursors, topk, max_docid, &mut seen)
        else {
            break;
        };
        if pivot_id == cursors[0].docid() {
            let mut score = 0.0;
            let mut tied = 0;
            for c in cursors.iter() {
                if c.docid() != pivot_id {
                    break;
                }
                score += c.score();
                tied += 1;
            }
            topk.insert(score, pivot_id);
            for c in &mut cursors[..tied] {
                c.next();
            }
            cursors.sort_by_key(PivotCursor::docid);
        } else {
            let next_list = backward_distinct(cursors, pivot, pivot_id);
            cursors[next_list].next_geq(pivot_id);
            bubble_forward(cursors, next_list);
        }
    }
}
