//! Small ambient-CLI convenience around the query-evaluation core: reads a
//! canonical index, builds an in-memory backend, evaluates one query line
//! with the chosen algorithm, prints the top-k.
//!
//! There is no production-grade equivalent of this tool in the original
//! source (query evaluation there is a library embedded in a benchmark
//! harness); the clap-derive shape follows
//! `examples/fschlatt-seismic/src/bin/build_inverted_index.rs`.

use std::fs::File;

use clap::{Parser, ValueEnum};
use log::info;

use pruneq::decompose::read_index;
use pruneq::mem::MemoryIndex;
use pruneq::query::parse_query;
use pruneq::{Algorithm, Configuration, PruneqError, Scorer, TermId};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    Wand,
    PairAwareWand,
    BlockMaxWand,
    Maxscore,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Wand => Algorithm::Wand,
            AlgorithmArg::PairAwareWand => Algorithm::PairAwareWand,
            AlgorithmArg::BlockMaxWand => Algorithm::BlockMaxWand,
            AlgorithmArg::Maxscore => Algorithm::Maxscore,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the input lexicon (one already-decomposed `_HIGH`/`_LOW`
    /// term per line).
    #[clap(short, long, value_parser)]
    terms: String,

    /// Path to the input `.docs` file.
    #[clap(short, long, value_parser)]
    docs: String,

    /// Path to the input `.freqs` file.
    #[clap(short, long, value_parser)]
    freqs: String,

    /// The query, in `<id>:<tok>_HIGH <tok>_LOW ...` wire format.
    #[clap(short, long, value_parser)]
    query: String,

    /// Number of results to return.
    #[clap(short, long, value_parser)]
    #[arg(default_value_t = 10)]
    k: usize,

    #[clap(short, long, value_parser)]
    #[arg(value_enum, default_value_t = AlgorithmArg::Wand)]
    algorithm: AlgorithmArg,

    /// Posting-list block size for block-max enumerators.
    #[clap(long, value_parser)]
    #[arg(default_value_t = 8)]
    block_size: usize,

    /// Seed the top-k threshold from the HIGH/LOW length invariant before
    /// scanning.
    #[clap(long, value_parser)]
    #[arg(default_value_t = false)]
    prime: bool,
}

/// `freq` is already the raw BM25-style weight baked into the index at
/// decomposition time in this demo mode: there is no separate scoring
/// model wired in, so the scorer is the identity on frequency.
struct IdentityScorer;

impl Scorer for IdentityScorer {
    fn score(&self, _term: TermId, _docid: pruneq::DocId, freq: u32) -> f32 {
        freq as f32
    }
}

struct TermLookup {
    names: Vec<String>,
}

impl pruneq::query::TermResolver for TermLookup {
    fn resolve(&self, token: &str) -> Option<TermId> {
        self.names.iter().position(|n| n == token).map(|p| p as TermId)
    }
}

fn main() -> Result<(), PruneqError> {
    env_logger::init();
    let args = Args::parse();

    let terms_file = File::open(&args.terms)?;
    let docs_file = File::open(&args.docs)?;
    let freqs_file = File::open(&args.freqs)?;
    let lists = read_index(terms_file, docs_file, freqs_file)?;
    info!("loaded {} posting lists", lists.len());

    let names: Vec<String> = lists.iter().map(|l| l.term.clone()).collect();
    let max_scores: Vec<f32> = lists
        .iter()
        .map(|l| l.freqs.iter().copied().max().unwrap_or(0) as f32)
        .collect();
    let mem_lists: Vec<pruneq::mem::PostingList> = lists
        .into_iter()
        .map(|l| pruneq::mem::PostingList::new(l.docids, l.freqs))
        .collect();

    let index = MemoryIndex::new(mem_lists, max_scores, args.block_size, IdentityScorer);
    let resolver = TermLookup { names };
    let query = parse_query(&args.query, &resolver)?;
    let max_docid = index.num_docs();

    let config = Configuration::default()
        .algorithm(args.algorithm.into())
        .k(args.k)
        .prime(args.prime);
    let results = config.evaluate(&query, &index, max_docid);

    for (score, docid) in results {
        println!("{docid}\t{score}");
    }

    Ok(())
}
