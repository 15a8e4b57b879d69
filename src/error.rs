//! Error kinds per `spec.md` §7. Query evaluation itself never errors
//! (pruning algorithms only ever mutate a [`crate::topk::TopKQueue`]); only
//! the query parser and the offline index decomposer return [`PruneqError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PruneqError {
    /// A query token did not end in `_HIGH` or `_LOW` (`spec.md` §6, §7.1).
    #[error("term `{token}` is neither HIGH nor LOW")]
    MalformedQueryToken { token: String },

    /// `.docs`/`.freqs` sequence lengths disagreed (`spec.md` §6, §7.3).
    #[error("docs/freqs alignment mismatch for term {term_id}: docs len {docs_len}, freqs len {freqs_len}")]
    AlignmentMismatch {
        term_id: u32,
        docs_len: u32,
        freqs_len: u32,
    },

    /// Splits file cardinality did not match the lexicon (`spec.md` §6).
    #[error("splits file has {splits_len} entries, lexicon has {lexicon_len}")]
    SplitsLexiconMismatch { splits_len: usize, lexicon_len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("(de)serialization error: {0}")]
    Bincode(#[from] bincode::Error),
}
