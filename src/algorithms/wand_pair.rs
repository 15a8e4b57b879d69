//! Fused-cursor pair WAND (`SPEC_FULL.md` §4.8): WAND over
//! [`crate::cursor::PairedCursor`]s, which fuse each logical term's HIGH and
//! LOW sides so no pivot-level bitmap is needed. Instead the scan tracks the
//! smallest still-unvisited HIGH-side docid across all cursors and refuses
//! to emit (or terminate) past it without first giving it a chance to
//! surface.
//!
//! Grounded in
//! `original_source/pisa-decomposition/include/pisa/query/algorithm/wand_pair_query.hpp`.
//! Per `SPEC_FULL.md` §4.8, this algorithm does not support priming (the
//! source has no `prime` parameter for it).

use crate::cursor::{PairedDocid, PivotCursor, SafeThreshold};
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

fn min_non_considered_high<T: PairedDocid>(cursors: &[T]) -> DocId {
    cursors
        .iter()
        .map(PairedDocid::non_considered_high_docid)
        .min()
        .unwrap_or(DocId::MAX)
}

/// Advances every cursor at position `< upto` (by docid) to `next_geq(upto)`
/// and restores docid order. Used both when no pivot exists and when a
/// found pivot outruns the minimum non-considered HIGH docid.
fn advance_before<T: PivotCursor>(cursors: &mut [T], upto: DocId) {
    for c in cursors.iter_mut() {
        if c.docid() < upto {
            c.next_geq(upto);
        }
    }
    cursors.sort_by_key(PivotCursor::docid);
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
            return Some((i, c.docid()));
        }
    }
    None
}

pub fn wand_pair<T: PivotCursor + SafeThreshold + PairedDocid>(
    cursors: &mut [T],
    max_docid: DocId,
    topk: &mut TopKQueue,
) {
    if cursors.is_empty() {
        return;
    }
    cursors.sort_by_key(PivotCursor::docid);

    loop {
        let min_high = min_non_considered_high(cursors);
        let Some((pivot, pivot_id)) = find_pivot(cursors, topk, max_docid) else {
            if min_high >= max_docid {
                break;
            }
            advance_before(cursors, min_high);
            continue;
        };

        if pivot_id > min_high {
            advance_before(cursors, min_high);
            continue;
        }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{brute_force_topk, build_index, query};
    use crate::cursor::build_paired_cursors;

    fn index_max_docid(lists: &[(Vec<DocId>, Vec<u32>)]) -> DocId {
        lists
            .iter()
            .flat_map(|(d, _)| d.last().copied())
            .max()
            .map_or(0, |d| d + 1)
    }

    #[test]
    fn wand_pair_matches_brute_force_on_a_paired_term() {
        let names = ["cat_HIGH", "cat_LOW"];
        let lists = vec![
            (vec![2, 7, 9], vec![9, 4, 8]),
            (vec![1, 2, 4, 6, 9], vec![1, 2, 1, 3, 1]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW");
        let mut cursors = build_paired_cursors(&q, &index);
        let mut topk = TopKQueue::new(3);
        wand_pair(&mut cursors, index_max_docid(&lists), &mut topk);

        let expected = brute_force_topk(&lists, &[0, 1], 3);
        assert_eq!(topk.topk(), expected);
    }

    #[test]
    fn wand_pair_matches_brute_force_with_duplicate_side() {
        // A lone HIGH term (no LOW counterpart resolved) becomes a
        // degenerate "same" pair.
        let names = ["dog_HIGH"];
        let lists = vec![(vec![1, 2, 9], vec![6, 2, 9])];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "dog_HIGH");
        let mut cursors = build_paired_cursors(&q, &index);
        let mut topk = TopKQueue::new(2);
        wand_pair(&mut cursors, index_max_docid(&lists), &mut topk);

        let expected = brute_force_topk(&lists, &[0], 2);
        assert_eq!(topk.topk(), expected);
    }

    #[test]
    fn wand_pair_matches_plain_wand_across_two_terms() {
        use crate::algorithms::wand::wand;
        use crate::cursor::build_max_scored_cursors;

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
        let mut plain_cursors = build_max_scored_cursors(&q, &index);
        wand(&mut plain_cursors, index_max_docid(&lists), &mut plain_topk, false);

        let mut fused_topk = TopKQueue::new(3);
        let mut fused_cursors = build_paired_cursors(&q, &index);
        wand_pair(&mut fused_cursors, index_max_docid(&lists), &mut fused_topk);

        assert_eq!(plain_topk.topk(), fused_topk.topk());
    }
}
