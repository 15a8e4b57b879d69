//! Offline HIGH/LOW posting-list decomposition (`spec.md` §6 "external
//! interfaces", the index-build component) and the canonical binary layout
//! it reads and writes.
//!
//! Grounded in `original_source/tools/split_index.cpp`.
//!
//! ## Binary layout
//!
//! `.docs` and `.freqs` each start with a 2-word little-endian `u32` header
//! `[1, num_docs]`, followed by one length-prefixed sequence per term:
//! `[length: u32, values: [u32; length]]`. `.terms` is one term string per
//! line, in the same order.

use std::io::{Read, Write};

use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PruneqError;
use crate::types::DocId;

/// One term's postings, read from or about to be written to the canonical
/// binary layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawPostingList {
    pub term: String,
    pub docids: Vec<u32>,
    pub freqs: Vec<u32>,
}

/// Reads the canonical `.docs`/`.freqs`/`.terms` triple into aligned
/// `RawPostingList`s. Returns [`PruneqError::AlignmentMismatch`] if a term's
/// docs and freqs sequences differ in length, and
/// [`PruneqError::SplitsLexiconMismatch`] if the lexicon and posting-list
/// count disagree — mirroring `split_index.cpp`'s fatal alignment checks,
/// but as a recoverable `Result` rather than a process exit.
pub fn read_index(
    terms: impl Read,
    docs: impl Read,
    freqs: impl Read,
) -> Result<Vec<RawPostingList>, PruneqError> {
    let lexicon = read_lexicon(terms)?;
    let mut docs = docs;
    let mut freqs = freqs;

    let (_, num_docs_d) = read_header(&mut docs)?;
    let (_, num_docs_f) = read_header(&mut freqs)?;
    let _ = (num_docs_d, num_docs_f);

    let mut lists = Vec::with_capacity(lexicon.len());
    for term in lexicon {
        let d_seq = read_sequence(&mut docs)?;
        let f_seq = read_sequence(&mut freqs)?;
        if d_seq.len() != f_seq.len() {
            return Err(PruneqError::AlignmentMismatch {
                term_id: lists.len() as u32,
                docs_len: d_seq.len() as u32,
                freqs_len: f_seq.len() as u32,
            });
        }
        lists.push(RawPostingList {
            term,
            docids: d_seq,
            freqs: f_seq,
        });
    }
    Ok(lists)
}

fn read_lexicon(terms: impl Read) -> Result<Vec<String>, PruneqError> {
    use std::io::BufRead;
    let reader = std::io::BufReader::new(terms);
    let mut out = Vec::new();
    for line in reader.lines() {
        out.push(line?);
    }
    Ok(out)
}

fn read_header(mut r: impl Read) -> Result<(u32, u32), PruneqError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok((
        u32::from_le_bytes(buf[0..4].try_into().unwrap()),
        u32::from_le_bytes(buf[4..8].try_into().unwrap()),
    ))
}

fn read_sequence(mut r: impl Read) -> Result<Vec<u32>, PruneqError> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;
    let mut values = Vec::with_capacity(len);
    let mut buf = [0u8; 4];
    for _ in 0..len {
        r.read_exact(&mut buf)?;
        values.push(u32::from_le_bytes(buf));
    }
    Ok(values)
}

fn write_header(w: &mut impl Write, num_docs: u32) -> Result<(), PruneqError> {
    w.write_all(&1u32.to_le_bytes())?;
    w.write_all(&num_docs.to_le_bytes())?;
    Ok(())
}

fn write_sequence(w: &mut impl Write, values: &[u32]) -> Result<(), PruneqError> {
    w.write_all(&(values.len() as u32).to_le_bytes())?;
    for &v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// A decomposed term: the HIGH side (`fdt > split_bound`) and LOW side
/// (`fdt <= split_bound`), either of which may be empty if every posting
/// fell on one side.
#[derive(Clone, Debug, Default)]
pub struct Decomposed {
    pub high_docids: Vec<u32>,
    pub high_freqs: Vec<u32>,
    pub low_docids: Vec<u32>,
    pub low_freqs: Vec<u32>,
}

/// Splits one term's postings by `split_bound`: `freq > split_bound` goes to
/// HIGH, `freq <= split_bound` to LOW. Relative docid order is preserved on
/// each side.
#[must_use]
pub fn split_posting_list(list: &RawPostingList, split_bound: u32) -> Decomposed {
    let mut out = Decomposed::default();
    for (&docid, &freq) in list.docids.iter().zip(&list.freqs) {
        if freq > split_bound {
            out.high_docids.push(docid);
            out.high_freqs.push(freq);
        } else {
            out.low_docids.push(docid);
            out.low_freqs.push(freq);
        }
    }
    out
}

/// Decomposes every term's postings in parallel (mirrors the teacher's use
/// of `rayon::par_iter` for index-building work), then sorts the resulting
/// `_HIGH`/`_LOW`-suffixed term names lexicographically before emitting,
/// matching `split_index.cpp`'s final sort pass.
#[must_use]
pub fn decompose_index(lists: &[RawPostingList], split_bound: u32) -> Vec<RawPostingList> {
    let mut out: Vec<RawPostingList> = lists
        .par_iter()
        .progress_count(lists.len() as u64)
        .flat_map_iter(|list| {
            let decomposed = split_posting_list(list, split_bound);
            let mut emitted = Vec::new();
            if !decomposed.high_docids.is_empty() {
                emitted.push(RawPostingList {
                    term: format!("{}_HIGH", list.term),
                    docids: decomposed.high_docids,
                    freqs: decomposed.high_freqs,
                });
            }
            if !decomposed.low_docids.is_empty() {
                emitted.push(RawPostingList {
                    term: format!("{}_LOW", list.term),
                    docids: decomposed.low_docids,
                    freqs: decomposed.low_freqs,
                });
            }
            emitted
        })
        .collect();
    out.sort_by(|a, b| a.term.cmp(&b.term));
    out
}

/// Writes a decomposed index out in the canonical binary layout.
pub fn write_index(
    lists: &[RawPostingList],
    num_docs: u32,
    mut terms: impl Write,
    mut docs: impl Write,
    mut freqs: impl Write,
) -> Result<(), PruneqError> {
    write_header(&mut docs, num_docs)?;
    write_header(&mut freqs, num_docs)?;
    for list in lists {
        writeln!(terms, "{}", list.term)?;
        write_sequence(&mut docs, &list.docids)?;
        write_sequence(&mut freqs, &list.freqs)?;
    }
    Ok(())
}

#[must_use]
pub fn max_docid(lists: &[RawPostingList]) -> DocId {
    lists
        .iter()
        .flat_map(|l| l.docids.last().copied())
        .max()
        .unwrap_or(0)
}

/// Serializes a decomposed index as a single `bincode` blob, for callers
/// that want one seekable artifact instead of the three-file `.docs`/
/// `.freqs`/`.terms` layout (e.g. caching a split between pipeline runs).
pub fn write_bincode(lists: &[RawPostingList], w: impl Write) -> Result<(), PruneqError> {
    bincode::serialize_into(w, lists)?;
    Ok(())
}

pub fn read_bincode(r: impl Read) -> Result<Vec<RawPostingList>, PruneqError> {
    Ok(bincode::deserialize_from(r)?)
}
