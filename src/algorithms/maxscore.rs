//! MaxScore, length-sorted MaxScore, pair-aware MaxScore and `high_then_low`
//! (`spec.md` §4.6, §4.7).
//!
//! Grounded in
//! `original_source/pisa-decomposition/include/pisa/query/algorithm/maxscore_query.hpp`.

use std::collections::HashSet;

use crate::algorithms::priming::prime_heap;
use crate::bitset::PairBitset;
use crate::cursor::{PairAware, PivotCursor, SafeThreshold};
use crate::topk::TopKQueue;
use crate::types::DocId;

fn sorted_by_bound_order<T: PivotCursor>(cursors: &[T]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..cursors.len()).collect();
    idx.sort_by(|&a, &b| cursors[b].max_score().total_cmp(&cursors[a].max_score()));
    idx
}

fn sorted_by_length_order<T: PivotCursor>(cursors: &[T]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..cursors.len()).collect();
    idx.sort_by_key(|&i| cursors[i].size());
    idx
}

fn reorder<T>(cursors: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = cursors.into_iter().map(Some).collect();
    order.iter().map(|&i| slots[i].take().unwrap()).collect()
}

/// Suffix sums of `max_score()` from the end: `bounds[i] = sum of
/// cursors[i..].max_score()`. `bounds[len]` is always 0.
fn calc_upper_bounds<T: PivotCursor>(cursors: &[T]) -> Vec<f32> {
    let mut bounds = vec![0.0; cursors.len() + 1];
    for i in (0..cursors.len()).rev() {
        bounds[i] = bounds[i + 1] + cursors[i].max_score();
    }
    bounds
}

/// Pair-aware suffix sums: a logical term seen again further down the
/// (length-ascending) list has its smaller bound subtracted once, same
/// dedup rule as the pivot-based algorithms (`spec.md` §4.4).
fn calc_upper_bounds_pair_aware<T: PivotCursor + PairAware>(cursors: &[T]) -> Vec<f32> {
    let mut bounds = vec![0.0; cursors.len() + 1];
    let mut seen = PairBitset::new();
    for i in (0..cursors.len()).rev() {
        let c = &cursors[i];
        let slot = c.pair_id() % 64;
        let contribution = if seen.get(slot) {
            c.max_score() - c.low_max_score()
        } else {
            seen.set(slot, true);
            c.max_score()
        };
        bounds[i] = bounds[i + 1] + contribution;
    }
    bounds
}

fn min_docid<T: PivotCursor>(cursors: &[T]) -> DocId {
    cursors.iter().map(PivotCursor::docid).min().unwrap_or(DocId::MAX)
}

/// The core MaxScore loop (`spec.md` §4.6): `cursors` are partitioned at
/// runtime into an essential prefix (scanned like an OR) and a non-essential
/// suffix (looked up only for candidates the essential prefix already
/// promotes), the split shrinking as `topk`'s threshold rises.
/// `skip` optionally excludes already-scored docids (used by
/// `high_then_low`'s second, LOW-only pass).
fn run_sorted<T: PivotCursor>(
    cursors: &mut [T],
    upper_bounds: &[f32],
    max_docid: DocId,
    topk: &mut TopKQueue,
    skip: Option<&HashSet<DocId>>,
) {
    if cursors.is_empty() {
        return;
    }
    let mut essential_len = cursors.len();

    let shrink = |essential_len: &mut usize, topk: &TopKQueue| {
        while *essential_len > 1 && !topk.would_enter(upper_bounds[*essential_len - 1]) {
            *essential_len -= 1;
        }
    };
    shrink(&mut essential_len, topk);

    loop {
        if essential_len == 0 {
            break;
        }
        let next_docid = min_docid(&cursors[..essential_len]);
        if next_docid >= max_docid {
            break;
        }

        let already_scored = skip.is_some_and(|s| s.contains(&next_docid));
        let mut score = 0.0;
        for c in &mut cursors[..essential_len] {
            if c.docid() == next_docid {
                if !already_scored {
                    score += c.score();
                }
                c.next();
            }
        }

        if !already_scored {
            let mut candidate_alive = true;
            for pos in essential_len..cursors.len() {
                if !topk.would_enter(score + upper_bounds[pos]) {
                    candidate_alive = false;
                    break;
                }
                let c = &mut cursors[pos];
                c.next_geq(next_docid);
                if c.docid() == next_docid {
                    score += c.score();
                }
            }
            if candidate_alive {
                topk.insert(score, next_docid);
            }
        }

        shrink(&mut essential_len, topk);
    }
}

/// Plain MaxScore: cursors ordered by descending `max_score()`.
pub fn maxscore<T: PivotCursor + SafeThreshold>(
    cursors: Vec<T>,
    max_docid: DocId,
    topk: &mut TopKQueue,
    prime: bool,
) -> Vec<T> {
    let order = sorted_by_bound_order(&cursors);
    let mut cursors = reorder(cursors, &order);
    if prime {
        prime_heap(&cursors, topk);
    }
    let bounds = calc_upper_bounds(&cursors);
    run_sorted(&mut cursors, &bounds, max_docid, topk, None);
    cursors
}

/// MaxScore with cursors ordered by ascending list length instead of
/// descending bound; otherwise identical (`spec.md` §4.6 notes this as an
/// alternative ordering the same loop supports).
pub fn length_sorted_maxscore<T: PivotCursor + SafeThreshold>(
    cursors: Vec<T>,
    max_docid: DocId,
    topk: &mut TopKQueue,
    prime: bool,
) -> Vec<T> {
    let order = sorted_by_length_order(&cursors);
    let mut cursors = reorder(cursors, &order);
    if prime {
        prime_heap(&cursors, topk);
    }
    let bounds = calc_upper_bounds(&cursors);
    run_sorted(&mut cursors, &bounds, max_docid, topk, None);
    cursors
}

/// Pair-aware MaxScore: cursors ordered by ascending length (as in the
/// source), suffix bounds deduped by pair id.
pub fn pair_aware_maxscore<T: PivotCursor + SafeThreshold + PairAware>(
    cursors: Vec<T>,
    max_docid: DocId,
    topk: &mut TopKQueue,
    prime: bool,
) -> Vec<T> {
    let order = sorted_by_length_order(&cursors);
    let mut cursors = reorder(cursors, &order);
    if prime {
        prime_heap(&cursors, topk);
    }
    let bounds = calc_upper_bounds_pair_aware(&cursors);
    run_sorted(&mut cursors, &bounds, max_docid, topk, None);
    cursors
}

/// `high_then_low` (`spec.md` §4.6): an exhaustive OR pass over the HIGH
/// cursors recording every visited docid, then a MaxScore pass over the LOW
/// cursors that skips docids the HIGH pass already scored.
pub fn high_then_low<T: PivotCursor + SafeThreshold>(
    mut high: Vec<T>,
    mut low: Vec<T>,
    max_docid: DocId,
    topk: &mut TopKQueue,
    prime: bool,
) -> (Vec<T>, Vec<T>) {
    if prime {
        prime_heap(&high, topk);
        prime_heap(&low, topk);
    }

    let mut visited = HashSet::new();
    loop {
        let next_docid = min_docid(&high);
        if next_docid >= max_docid {
            break;
        }
        let mut score = 0.0;
        for c in &mut high {
            if c.docid() == next_docid {
                score += c.score();
                c.next();
            }
        }
        visited.insert(next_docid);
        topk.insert(score, next_docid);
    }

    let order = sorted_by_bound_order(&low);
    low = reorder(low, &order);
    let bounds = calc_upper_bounds(&low);
    run_sorted(&mut low, &bounds, max_docid, topk, Some(&visited));

    (high, low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{brute_force_topk, build_index, query};
    use crate::cursor::build_max_scored_cursors;

    fn index_max_docid(lists: &[(Vec<DocId>, Vec<u32>)]) -> DocId {
        lists
            .iter()
            .flat_map(|(d, _)| d.last().copied())
            .max()
            .map_or(0, |d| d + 1)
    }

    #[test]
    fn maxscore_matches_brute_force() {
        let names = ["cat_HIGH", "cat_LOW"];
        let lists = vec![
            (vec![2, 7, 9], vec![9, 4, 8]),
            (vec![1, 2, 4, 6, 9], vec![1, 2, 1, 3, 1]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW");
        let cursors = build_max_scored_cursors(&q, &index);
        let mut topk = TopKQueue::new(3);
        maxscore(cursors, index_max_docid(&lists), &mut topk, false);

        let expected = brute_force_topk(&lists, &[0, 1], 3);
        assert_eq!(topk.topk(), expected);
    }

    #[test]
    fn length_sorted_maxscore_matches_bound_sorted() {
        let names = ["cat_HIGH", "cat_LOW", "dog_HIGH", "dog_LOW"];
        let lists = vec![
            (vec![1, 5, 8], vec![5, 3, 7]),
            (vec![2, 5, 6, 9], vec![1, 2, 1, 1]),
            (vec![1, 2, 9], vec![6, 2, 9]),
            (vec![3, 5, 6, 8], vec![1, 1, 2, 1]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW dog_HIGH dog_LOW");

        let mut bound_topk = TopKQueue::new(3);
        let cursors = build_max_scored_cursors(&q, &index);
        maxscore(cursors, index_max_docid(&lists), &mut bound_topk, false);

        let mut length_topk = TopKQueue::new(3);
        let cursors = build_max_scored_cursors(&q, &index);
        length_sorted_maxscore(cursors, index_max_docid(&lists), &mut length_topk, false);

        assert_eq!(bound_topk.topk(), length_topk.topk());
    }

    #[test]
    fn pair_aware_maxscore_matches_plain() {
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
        let cursors = build_max_scored_cursors(&q, &index);
        maxscore(cursors, index_max_docid(&lists), &mut plain_topk, false);

        let mut pair_topk = TopKQueue::new(3);
        let cursors = build_max_scored_cursors(&q, &index);
        pair_aware_maxscore(cursors, index_max_docid(&lists), &mut pair_topk, false);

        assert_eq!(plain_topk.topk(), pair_topk.topk());
    }

    #[test]
    fn high_then_low_matches_brute_force() {
        let names = ["cat_HIGH", "cat_LOW"];
        let lists = vec![
            (vec![2, 7, 9], vec![9, 4, 8]),
            (vec![1, 2, 4, 6, 9], vec![1, 2, 1, 3, 1]),
        ];
        let index = build_index(&names, lists.clone());
        let q = query(&names, "cat_HIGH cat_LOW");
        let cursors = build_max_scored_cursors(&q, &index);

        let mut high = Vec::new();
        let mut low = Vec::new();
        for (c, &is_high) in cursors.into_iter().zip(&q.is_high) {
            if is_high {
                high.push(c);
            } else {
                low.push(c);
            }
        }

        let mut topk = TopKQueue::new(3);
        high_then_low(high, low, index_max_docid(&lists), &mut topk, false);

        let expected = brute_force_topk(&lists, &[0, 1], 3);
        assert_eq!(topk.topk(), expected);
    }
}
