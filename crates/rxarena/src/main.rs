use clap::Parser;
use rxarena::cli::Cli;
use rxarena::discover::discover_corpus;
use rxarena::output::{arena_json, list_json, workbench_json, Output};
use rxarena::runner::{load_corpus, ranked, run_arena, run_workbench, CaseResult};
use rxarena::update::update_benchmark_file;
use std::collections::BTreeMap;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("RXARENA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    // Reset SIGPIPE handler to default (terminate) so piping to head/tail works correctly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    let cli = Cli::parse();
    init_logging();

    let use_color = !cli.no_color && !cli.json && atty::is(atty::Stream::Stdout);
    let mut output = Output::new(use_color);

    let root = cli.root.canonicalize().unwrap_or(cli.root.clone());
    let corpus = discover_corpus(&root)?;
    let loaded = load_corpus(&corpus, cli.benchmark.as_deref());

    for error in &loaded.errors {
        eprintln!("Error: {}", error);
    }

    if cli.list {
        if cli.json {
            output.print_json(&list_json(&loaded.benchmarks, &loaded.candidates));
        } else {
            output.print_list(&loaded.benchmarks, &loaded.candidates);
        }
        std::process::exit(if loaded.errors.is_empty() { 0 } else { 1 });
    }

    if loaded.benchmarks.is_empty() {
        eprintln!("No benchmarks found");
        std::process::exit(1);
    }

    let passed = match &cli.pattern {
        Some(pattern) => {
            let flags = cli.flags.as_deref().unwrap_or("");
            let result = run_workbench(pattern, flags, &loaded.benchmarks);

            if cli.update {
                let failed: Vec<&CaseResult> = result.cases.iter().filter(|c| !c.passed).collect();
                for (path, cases) in group_by_file(&failed) {
                    let changed = update_benchmark_file(path, &cases)?;
                    if changed > 0 {
                        eprintln!("Updated: {} ({} case(s))", path.display(), changed);
                    }
                }
            }

            if cli.json {
                output.print_json(&workbench_json(&result));
            } else {
                output.print_workbench(&result, cli.verbose);
            }
            result.passed()
        }
        None => {
            if loaded.candidates.is_empty() {
                eprintln!("No candidates found");
                std::process::exit(1);
            }

            let results = run_arena(&loaded.candidates, &loaded.benchmarks, cli.sequential);
            let ranked = ranked(&results);
            if cli.json {
                output.print_json(&arena_json(&ranked));
            } else {
                output.print_arena(&ranked, cli.verbose);
            }
            results.iter().any(|r| r.passed())
        }
    };

    let success = passed && loaded.errors.is_empty();
    std::process::exit(if success { 0 } else { 1 });
}

fn group_by_file<'a>(cases: &[&'a CaseResult]) -> BTreeMap<&'a Path, Vec<&'a CaseResult>> {
    let mut files: BTreeMap<&Path, Vec<&CaseResult>> = BTreeMap::new();
    for &case in cases {
        files.entry(case.file_path.as_path()).or_default().push(case);
    }
    files
}
