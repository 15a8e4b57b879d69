//! Offline HIGH/LOW decomposition tool: reads a canonical `.docs`/`.freqs`/
//! `.terms` index and writes the decomposed variant.
//!
//! Grounded in `original_source/tools/split_index.cpp`, with a clap CLI in
//! the teacher's style (`examples/fschlatt-seismic/src/bin/build_inverted_index.rs`).

use std::fs::File;
use std::io::{BufWriter, Write};

use clap::Parser;
use log::info;

use pruneq::decompose::{decompose_index, read_index, write_index};
use pruneq::PruneqError;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the input lexicon (one term per line).
    #[clap(short, long, value_parser)]
    terms: String,

    /// Path to the input `.docs` file.
    #[clap(short, long, value_parser)]
    docs: String,

    /// Path to the input `.freqs` file.
    #[clap(short, long, value_parser)]
    freqs: String,

    /// Output file prefix; writes `<prefix>.terms`, `<prefix>.docs`,
    /// `<prefix>.freqs`.
    #[clap(short, long, value_parser)]
    output: String,

    /// Postings with frequency strictly greater than this go to the HIGH
    /// list, everything else to LOW.
    #[clap(short, long, value_parser)]
    #[arg(default_value_t = 1)]
    split_bound: u32,
}

fn main() -> Result<(), PruneqError> {
    env_logger::init();
    let args = Args::parse();

    let terms_file = File::open(&args.terms)?;
    let docs_file = File::open(&args.docs)?;
    let freqs_file = File::open(&args.freqs)?;

    let lists = read_index(terms_file, docs_file, freqs_file)?;
    info!("read {} posting lists", lists.len());

    let num_docs = pruneq::decompose::max_docid(&lists) + 1;
    let decomposed = decompose_index(&lists, args.split_bound);
    info!("decomposed into {} HIGH/LOW lists", decomposed.len());

    let terms_out = BufWriter::new(File::create(format!("{}.terms", args.output))?);
    let docs_out = BufWriter::new(File::create(format!("{}.docs", args.output))?);
    let freqs_out = BufWriter::new(File::create(format!("{}.freqs", args.output))?);
    write_index(&decomposed, num_docs, terms_out, docs_out, freqs_out)?;

    Ok(())
}
