//! Query-evaluation configuration: which pruning algorithm to run, whether to
//! prime the top-k threshold, and how many results to return.
//!
//! Grounded in the teacher's own `inverted_index::Configuration`: a small
//! `#[derive(Default)]` struct with consuming `self -> Self` builder methods,
//! used here for the one parameter space this crate actually has (algorithm
//! choice + `k` + priming), in place of the teacher's index-build-time
//! pruning/blocking/summarization strategies, which have no counterpart
//! here.

use serde::{Deserialize, Serialize};

use crate::algorithms::{block_max_wand, maxscore, pair_aware_wand, wand};
use crate::cursor::{build_block_max_scored_cursors, build_max_scored_cursors, CursorSource};
use crate::query::Query;
use crate::scorer::Scorer;
use crate::topk::TopKQueue;
use crate::types::{DocId, Score};

/// Which pruning algorithm [`Configuration::evaluate`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Wand,
    PairAwareWand,
    BlockMaxWand,
    Maxscore,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Wand
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    algorithm: Algorithm,
    k: usize,
    prime: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            k: 10,
            prime: false,
        }
    }
}

impl Configuration {
    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    #[must_use]
    pub fn prime(mut self, prime: bool) -> Self {
        self.prime = prime;
        self
    }

    /// Runs `query` against `source` per this configuration and returns the
    /// top-k `(score, docid)` pairs, score descending then docid ascending.
    pub fn evaluate<Src, S>(&self, query: &Query, source: &Src, max_docid: DocId) -> Vec<(Score, DocId)>
    where
        Src: CursorSource<S>,
        S: Scorer,
    {
        let mut topk = TopKQueue::new(self.k);
        match self.algorithm {
            Algorithm::Wand => {
                let mut cursors = build_max_scored_cursors(query, source);
                wand(&mut cursors, max_docid, &mut topk, self.prime);
            }
            Algorithm::PairAwareWand => {
                let mut cursors = build_max_scored_cursors(query, source);
                pair_aware_wand(&mut cursors, max_docid, &mut topk, self.prime);
            }
            Algorithm::BlockMaxWand => {
                let mut cursors = build_block_max_scored_cursors(query, source);
                block_max_wand(&mut cursors, max_docid, &mut topk, self.prime);
            }
            Algorithm::Maxscore => {
                let cursors = build_max_scored_cursors(query, source);
                maxscore(cursors, max_docid, &mut topk, self.prime);
            }
        }
        topk.topk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::{build_index, query};
    use crate::types::DocId;

    #[test]
    fn default_configuration_runs_wand_unprimed() {
        let names = ["cat_HIGH", "cat_LOW"];
        let lists = vec![
            (vec![2, 7, 9], vec![9, 4, 8]),
            (vec![1, 2, 4, 6, 9], vec![1, 2, 1, 3, 1]),
        ];
        let index = build_index(&names, lists);
        let q = query(&names, "cat_HIGH cat_LOW");

        let config = Configuration::default().k(2);
        let results = config.evaluate(&q, &index, DocId::MAX);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn builder_selects_requested_algorithm() {
        let names = ["cat_HIGH", "cat_LOW", "dog_HIGH", "dog_LOW"];
        let lists = vec![
            (vec![1, 5, 8], vec![5, 3, 7]),
            (vec![2, 5, 6, 9], vec![1, 2, 1, 1]),
            (vec![1, 2, 9], vec![6, 2, 9]),
            (vec![3, 5, 6, 8], vec![1, 1, 2, 1]),
        ];
        let index = build_index(&names, lists);
        let q = query(&names, "cat_HIGH cat_LOW dog_HIGH dog_LOW");

        let wand_results = Configuration::default()
            .algorithm(Algorithm::Wand)
            .k(3)
            .evaluate(&q, &index, DocId::MAX);
        let pair_aware_results = Configuration::default()
            .algorithm(Algorithm::PairAwareWand)
            .k(3)
            .evaluate(&q, &index, DocId::MAX);

        assert_eq!(wand_results, pair_aware_results);
    }
}
