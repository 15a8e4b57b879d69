#![doc = include_str!("../README.md")]

pub mod algorithms;
pub mod bitset;
pub mod broadword;
pub mod config;
pub mod cursor;
pub mod decompose;
pub mod error;
pub mod mem;
pub mod query;
pub mod scorer;
pub mod topk;
pub mod types;

pub use config::{Algorithm, Configuration};
pub use error::PruneqError;
pub use query::Query;
pub use scorer::Scorer;
pub use topk::TopKQueue;
pub use types::{DocId, Score, TermId};
