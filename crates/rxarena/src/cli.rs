use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rxarena",
    about = "Rank and refine regular expressions against benchmark suites",
    version
)]
pub struct Cli {
    /// Benchmark directory or a single benchmark file
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Evaluate this pattern instead of ranking the candidates
    #[arg(short, long, allow_hyphen_values = true)]
    pub pattern: Option<String>,

    /// Flags for --pattern, any of g, i, m, s, u, y
    #[arg(short, long, requires = "pattern")]
    pub flags: Option<String>,

    /// Only use benchmarks whose name or id contains this text
    #[arg(short, long)]
    pub benchmark: Option<String>,

    /// Flip the expectation of failing cases to what --pattern actually does
    #[arg(short, long, requires = "pattern")]
    pub update: bool,

    /// List benchmarks, cases and candidates
    #[arg(short, long)]
    pub list: bool,

    /// Show every case with its matches, and per-benchmark scores
    #[arg(short, long)]
    pub verbose: bool,

    /// Score candidates one at a time instead of in parallel
    #[arg(short, long)]
    pub sequential: bool,

    /// Print a JSON report instead of the human-readable one
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
