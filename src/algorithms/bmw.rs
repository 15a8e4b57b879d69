//! BlockMaxWAND (`spec.md` §4.5) and pair-aware BlockMaxWAND.
//!
//! Grounded in
//! `original_source/pisa-decomposition/include/pisa/query/algorithm/block_max_wand_query.hpp`.
//! Per `spec.md` §9 / `SPEC_FULL.md` §9, the source's `#ifdef _FANCY_`
//! experimental block-level dedup path is not part of the contract and is
//! intentionally not implemented: only the term-level pivot bound is
//! pair-aware here, exactly as in the non-`_FANCY_` build.

use crate::algorithms::priming::prime_heap;
use crate::bitset::PairBitset;
use crate::cursor::{BlockMax, PairAware, PivotCursor, SafeThreshold};
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

/// Bubbles `cursors[pos]` rightward past any cursor it now exceeds (strict
/// `<`, matching the source's block-bound-failed advance step).
fn bubble_forward<T: PivotCursor>(cursors: &mut [T], mut pos: usize) {
    while pos + 1 < cursors.len() && cursors[pos + 1].docid() < cursors[pos].docid() {
        cursors.swap(pos, pos + 1);
        pos += 1;
    }
}

/// Like [`bubble_forward`], but also swaps on a tie (`<=`), matching the
/// source's block-bound-passed/no-term-match advance step.
fn bubble_forward_or_tied<T: PivotCursor>(cursors: &mut [T], mut pos: usize) {
    while pos + 1 < cursors.len() && cursors[pos + 1].docid() <= cursors[pos].docid() {
        cursors.swap(pos, pos + 1);
        pos += 1;
    }
}

/// Extends `pivot` through every cursor tied with it at `pivot_id`, so the
/// caller's block-level bound sums the whole tied run rather than an
/// arbitrary prefix of it.
fn extend_pivot_through_ties<T: PivotCursor>(cursors: &[T], mut pivot: usize, pivot_id: DocId) -> usize {
    while pivot + 1 < cursors.len() && cursors[pivot + 1].docid() == pivot_id {
        pivot += 1;
    }
    pivot
}

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
            let pivot_id = c.docid();
            let pivot = extend_pivot_through_ties(cursors, i, pivot_id);
            return Some((pivot, pivot_id));
        }
    }
    None
}

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
            let pivot_id = c.docid();
            let pivot = extend_pivot_through_ties(cursors, i, pivot_id);
            return Some((pivot, pivot_id));
        }
    }
    None
}

/// Shared block-level refinement and emit/advance step, run after a
/// term-level pivot candidate is found by either [`find_pivot`] or
/// [`find_pivot_pair_aware`].
fn refine_and_step<T: PivotCursor + BlockMax>(
    cursors: &mut [T],
    pivot: usize,
    pivot_id: DocId,
    max_docid: DocId,
    topk: &mut TopKQueue,
) {
    let mut block_upper_bound = 0.0;
    for c in &mut cursors[..=pivot] {
        if c.block_max_docid() < pivot_id {
            c.block_max_next_geq(pivot_id);
        }
        block_upper_bound += c.block_max_score() * c.query_weight();
    }

    if !topk.would_enter(block_upper_bound) {
        let mut next_list = pivot;
        let mut best_bound = cursors[pivot].max_score();
        for (i, c) in cursors[..pivot].iter().enumerate() {
            if c.max_score() > best_bound {
                best_bound = c.max_score();
                next_list = i;
            }
        }

        let mut next = max_docid;
        for c in &mut cursors[..=pivot] {
            next = next.min(c.block_max_docid());
        }
        next = next.saturating_add(1);
        if let Some(next_doc) = cursors.get(pivot + 1).map(PivotCursor::docid) {
            if next_doc < next {
                next = next_doc;
            }
        }
        if next <= pivot_id {
            next = pivot_id + 1;
        }

        cursors[next_list].next_geq(next);
        bubble_forward(cursors, next_list);
        return;
    }

    if pivot_id == cursors[0].docid() {
        let mut score = 0.0;
        let mut bound = block_upper_bound;
        for c in cursors.iter_mut() {
            if c.docid() != pivot_id {
                break;
            }
            let part_score = c.score();
            let full_bound = c.block_max_score() * c.query_weight();
            score += part_score;
            bound -= full_bound - part_score;
            if !topk.would_enter(bound) {
                break;
            }
        }
        topk.insert(score, pivot_id);

        let mut tied = 0;
        while tied < cursors.len() && cursors[tied].docid() == pivot_id {
            tied += 1;
        }
        for c in &mut cursors[..tied] {
            c.next();
        }
        cursors.sort_by_key(PivotCursor::docid);
    } else {
        let next_list = backward_distinct(cursors, pivot, pivot_id);
        cursors[next_list].next_geq(pivot_id);
        bubble_forward_or_tied(cursors, next_list);
    }
}

pub fn block_max_wand<T: PivotCursor + SafeThreshold + BlockMax>(
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
        refine_and_step(cursors, pivot, pivot_id, max_docid, topk);
    }
}

pub fn pair_aware_block_max_wand<T: PivotCursor + SafeThreshold + PairAware + BlockMax>(
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
        refine_and_step(cursors, pivot, pivot_id, max_docid, topk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{brute_force_topk, build_index, query};
    use crate::cursor::build_block_max_scored_cursors;
    use crate::types::DocId;

    fn index_max_docid(lists: &[(Vec<DocId>, Vec<u32>)]) -> DocId {
        lists
            .iter()
            .flat_map(|(d, _)| d.last().copied())
            .max()
            .map_or(0, |d| d + 1)
    }

    #[test]
    fn block_max_wand_matches_brute_force() {
        let names = ["cat_HIGH", "cat_LOW"];
        let lists = vec![
            (vec![2, 7, 9, 12], vec![9, 4, 8, 2]),
            (vec![1, 2, 4, 6, 9, 11], vec![1, 2, 1, 3, 1, 5]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW");
        let mut cursors = build_block_max_scored_cursors(&q, &index);
        let mut topk = TopKQueue::new(3);
        block_max_wand(&mut cursors, index_max_docid(&lists), &mut topk, false);

        let expected = brute_force_topk(&lists, &[0, 1], 3);
        assert_eq!(topk.topk(), expected);
    }

    #[test]
    fn pair_aware_block_max_wand_matches_plain() {
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
        let mut cursors = build_block_max_scored_cursors(&q, &index);
        block_max_wand(&mut cursors, index_max_docid(&lists), &mut plain_topk, false);

        let mut pair_topk = TopKQueue::new(3);
        let mut cursors = build_block_max_scored_cursors(&q, &index);
        pair_aware_block_max_wand(&mut cursors, index_max_docid(&lists), &mut pair_topk, false);

        assert_eq!(plain_topk.topk(), pair_topk.topk());
    }
}
