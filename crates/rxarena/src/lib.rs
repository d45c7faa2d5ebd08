pub mod cli;
pub mod discover;
pub mod error;
pub mod output;
pub mod runner;
pub mod update;

pub use rxarena_corpus::{
    parse_benchmark_file, parse_benchmarks, parse_candidate_file, parse_candidates, Benchmark,
    Candidate, Case, ParseError,
};
