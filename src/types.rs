//! Core scalar types shared by the cursor layer, the query model and the
//! pruning algorithms.

/// Stable key into the index's term dictionary.
pub type TermId = u32;

/// Document identifier. Monotonically non-decreasing along any cursor.
///
/// `DocId::MAX` is never a valid document; callers pass the index's
/// `num_docs` as the `max_docid` sentinel to every algorithm entry point.
pub type DocId = u32;

/// A non-negative partial or final document score.
pub type Score = f32;
