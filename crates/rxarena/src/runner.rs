use crate::discover::Corpus;
use crate::error::Error;
use crate::{parse_benchmark_file, parse_candidate_file, Benchmark, Candidate, Case};
use rayon::prelude::*;
use rxarena_eval::{
    compile, execute, score_matcher, CompileError, MatchOutcome, ScoreReport, TestCase,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Everything read from a corpus. Files that fail to load are recorded in
/// `errors` and skipped.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    pub benchmarks: Vec<Benchmark>,
    pub candidates: Vec<Candidate>,
    pub errors: Vec<Error>,
}

impl LoadedCorpus {
    /// All cases of all benchmarks, in file and benchmark order.
    pub fn test_cases(&self) -> Vec<TestCase> {
        all_test_cases(&self.benchmarks)
    }
}

fn all_test_cases(benchmarks: &[Benchmark]) -> Vec<TestCase> {
    benchmarks.iter().flat_map(|b| b.test_cases()).collect()
}

fn benchmark_selected(benchmark: &Benchmark, filter: Option<&str>) -> bool {
    filter.is_none_or(|pat| benchmark.name.contains(pat) || benchmark.id.contains(pat))
}

pub fn load_corpus(corpus: &Corpus, filter: Option<&str>) -> LoadedCorpus {
    let mut loaded = LoadedCorpus::default();

    for path in &corpus.benchmark_files {
        match parse_benchmark_file(path) {
            Ok(benchmarks) => loaded.benchmarks.extend(
                benchmarks
                    .into_iter()
                    .filter(|b| benchmark_selected(b, filter)),
            ),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load benchmark file");
                loaded.errors.push(Error::from_parse(path, e));
            }
        }
    }

    for path in &corpus.candidate_files {
        match parse_candidate_file(path) {
            Ok(candidates) => {
                // Ids restart in every file; keep them unique across the corpus.
                for mut candidate in candidates {
                    candidate.id = format!("candidate-{}", loaded.candidates.len() + 1);
                    loaded.candidates.push(candidate);
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load candidate file");
                loaded.errors.push(Error::from_parse(path, e));
            }
        }
    }

    tracing::debug!(
        benchmarks = loaded.benchmarks.len(),
        cases = loaded.benchmarks.iter().map(|b| b.cases.len()).sum::<usize>(),
        candidates = loaded.candidates.len(),
        errors = loaded.errors.len(),
        "loaded corpus"
    );

    loaded
}

// ============ Workbench ============

#[derive(Debug, Clone)]
pub struct CaseResult {
    pub benchmark_id: String,
    pub file_path: PathBuf,
    pub case: Case,
    pub passed: bool,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone)]
pub struct WorkbenchResult {
    pub source: String,
    pub flags: String,
    pub compile_error: Option<CompileError>,
    pub cases: Vec<CaseResult>,
    pub report: ScoreReport,
    pub elapsed: Duration,
}

impl WorkbenchResult {
    pub fn literal(&self) -> String {
        format!("/{}/{}", self.source, self.flags)
    }

    pub fn passed(&self) -> bool {
        self.report.all_passed()
    }
}

/// Evaluate one pattern against every case, keeping the per-case outcomes
/// for display.
pub fn run_workbench(source: &str, flags: &str, benchmarks: &[Benchmark]) -> WorkbenchResult {
    let start = Instant::now();
    let matcher = compile(source, flags);

    let mut cases = Vec::new();
    for benchmark in benchmarks {
        for case in &benchmark.cases {
            let outcome = match &matcher {
                Ok(m) => execute(m, &case.test.input),
                Err(e) => MatchOutcome::from_error(e.clone()),
            };
            cases.push(CaseResult {
                benchmark_id: benchmark.id.clone(),
                file_path: benchmark.file_path.clone(),
                case: case.clone(),
                passed: outcome.error.is_none() && outcome.matched == case.test.should_match,
                outcome,
            });
        }
    }

    let report = ScoreReport::from_verdicts(
        cases
            .iter()
            .map(|c| (c.case.test.input.as_str(), c.passed)),
    );
    let compile_error = matcher.err();
    if let Some(e) = &compile_error {
        tracing::debug!(source, flags, error = %e, "workbench pattern failed to compile");
    }

    WorkbenchResult {
        source: source.to_string(),
        flags: flags.to_string(),
        compile_error,
        cases,
        report,
        elapsed: start.elapsed(),
    }
}

// ============ Arena ============

#[derive(Debug, Clone)]
pub struct BenchmarkScore {
    pub benchmark_id: String,
    pub name: String,
    pub report: ScoreReport,
}

#[derive(Debug, Clone)]
pub struct CandidateResult {
    pub candidate: Candidate,
    pub compile_error: Option<CompileError>,
    pub report: ScoreReport,
    pub per_benchmark: Vec<BenchmarkScore>,
}

impl CandidateResult {
    pub fn passed(&self) -> bool {
        self.report.all_passed()
    }
}

pub fn score_candidate(candidate: &Candidate, benchmarks: &[Benchmark]) -> CandidateResult {
    let matcher = compile(&candidate.source, &candidate.flags);

    let report = score_matcher(&matcher, &all_test_cases(benchmarks));
    let per_benchmark = benchmarks
        .iter()
        .map(|b| BenchmarkScore {
            benchmark_id: b.id.clone(),
            name: b.name.clone(),
            report: score_matcher(&matcher, &b.test_cases()),
        })
        .collect();

    tracing::debug!(
        candidate = %candidate.id,
        pass_rate = report.pass_rate,
        "scored candidate"
    );

    CandidateResult {
        candidate: candidate.clone(),
        compile_error: matcher.err(),
        report,
        per_benchmark,
    }
}

/// Score every candidate against all cases of all benchmarks. Results come
/// back in candidate order.
pub fn run_arena(
    candidates: &[Candidate],
    benchmarks: &[Benchmark],
    sequential: bool,
) -> Vec<CandidateResult> {
    if sequential || candidates.len() <= 1 {
        candidates
            .iter()
            .map(|c| score_candidate(c, benchmarks))
            .collect()
    } else {
        candidates
            .par_iter()
            .map(|c| score_candidate(c, benchmarks))
            .collect()
    }
}

/// Results ordered by pass rate, best first. Ties keep candidate order.
pub fn ranked(results: &[CandidateResult]) -> Vec<&CandidateResult> {
    let mut sorted: Vec<_> = results.iter().collect();
    sorted.sort_by(|a, b| b.report.pass_rate.total_cmp(&a.report.pass_rate));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::discover_corpus;
    use rxarena_eval::evaluate;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const EMAIL_BENCH: &str = "===
Basic Email Format
===
Validates standard email addresses
---
+ user@example.com
+ test.user@domain.co.uk
- invalid@
- @example.com

===
Special Characters
===
---
+ user+tag@example.com
- user name@example.com
";

    const CANDIDATES: &str = r"===
Strict
===
/^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$/
---
Standard shape with a TLD of two or more letters.

===
Anything with an at
===
/@/

===
Broken
===
/(/
";

    fn benchmarks() -> Vec<Benchmark> {
        rxarena_corpus::parse_benchmarks(EMAIL_BENCH, Path::new("email.txt")).unwrap()
    }

    fn candidates() -> Vec<Candidate> {
        rxarena_corpus::parse_candidates(CANDIDATES, Path::new("email/_candidates.txt")).unwrap()
    }

    #[test]
    fn test_workbench_all_pass() {
        let result = run_workbench(
            r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
            "",
            &benchmarks(),
        );
        assert!(result.passed());
        assert_eq!(result.cases.len(), 6);
        assert!(result.cases.iter().all(|c| c.passed));
        assert_eq!(result.report.pass_rate, 100.0);
        assert!(result.compile_error.is_none());
    }

    #[test]
    fn test_workbench_records_outcomes() {
        let result = run_workbench("@", "g", &benchmarks());
        assert_eq!(result.literal(), "/@/g");
        let first = &result.cases[0];
        assert_eq!(first.benchmark_id, "email-1");
        assert_eq!(first.outcome.spans.len(), 1);
        assert_eq!(first.outcome.spans[0].start, 4);

        // "invalid@" and "@example.com" contain an @ but should not match.
        assert_eq!(result.report.failed_inputs.len(), 3);
        assert!(!result.passed());
    }

    #[test]
    fn test_workbench_compile_error_fails_everything() {
        let result = run_workbench("(", "", &benchmarks());
        assert!(matches!(result.compile_error, Some(CompileError::Syntax { .. })));
        assert!(result.cases.iter().all(|c| !c.passed));
        assert!(result.cases.iter().all(|c| c.outcome.error.is_some()));
        assert_eq!(result.report.pass_rate, 0.0);
        assert_eq!(result.report.failed_inputs.len(), 6);
    }

    #[test]
    fn test_arena_scores_and_ranks() {
        let benchmarks = benchmarks();
        let results = run_arena(&candidates(), &benchmarks, false);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].candidate.name, "Strict");
        assert_eq!(results[0].report.pass_rate, 100.0);
        assert!(results[0].passed());
        assert_eq!(results[0].per_benchmark.len(), 2);

        assert!(results[2].compile_error.is_some());
        assert_eq!(results[2].report.pass_rate, 0.0);

        let order: Vec<&str> = ranked(&results)
            .iter()
            .map(|r| r.candidate.name.as_str())
            .collect();
        assert_eq!(order, vec!["Strict", "Anything with an at", "Broken"]);
    }

    #[test]
    fn test_arena_parallel_matches_sequential() {
        let benchmarks = benchmarks();
        let parallel = run_arena(&candidates(), &benchmarks, false);
        let sequential = run_arena(&candidates(), &benchmarks, true);
        let rates = |rs: &[CandidateResult]| -> Vec<f64> {
            rs.iter().map(|r| r.report.pass_rate).collect()
        };
        assert_eq!(rates(&parallel), rates(&sequential));
    }

    #[test]
    fn test_ranked_ties_keep_order() {
        let benchmarks = benchmarks();
        let mut cands = candidates();
        cands.truncate(1);
        cands.push(Candidate {
            id: "candidate-9".to_string(),
            name: "Strict again".to_string(),
            ..cands[0].clone()
        });
        let results = run_arena(&cands, &benchmarks, true);
        let order: Vec<&str> = ranked(&results)
            .iter()
            .map(|r| r.candidate.name.as_str())
            .collect();
        assert_eq!(order, vec!["Strict", "Strict again"]);
    }

    #[test]
    fn test_load_corpus_with_filter_and_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("email.txt"), EMAIL_BENCH).unwrap();
        fs::write(tmp.path().join("broken.txt"), "===\nb\n===\n---\n? what\n").unwrap();
        fs::write(tmp.path().join("_candidates.txt"), CANDIDATES).unwrap();

        let corpus = discover_corpus(tmp.path()).unwrap();
        let loaded = load_corpus(&corpus, Some("Special"));
        assert_eq!(loaded.benchmarks.len(), 1);
        assert_eq!(loaded.benchmarks[0].name, "Special Characters");
        assert_eq!(loaded.candidates.len(), 3);
        assert_eq!(loaded.errors.len(), 1);
        assert!(matches!(loaded.errors[0], Error::ParseCorpus { .. }));
        assert_eq!(loaded.test_cases().len(), 2);
    }

    #[test]
    fn test_candidate_ids_unique_across_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a")).unwrap();
        fs::create_dir_all(tmp.path().join("b")).unwrap();
        fs::write(tmp.path().join("a/email.txt"), EMAIL_BENCH).unwrap();
        fs::write(tmp.path().join("a/_candidates.txt"), CANDIDATES).unwrap();
        fs::write(tmp.path().join("b/_candidates.txt"), "===\nOnly\n===\n/x/\n").unwrap();

        let loaded = load_corpus(&discover_corpus(tmp.path()).unwrap(), None);
        let ids: Vec<&str> = loaded.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["candidate-1", "candidate-2", "candidate-3", "candidate-4"]
        );
        assert_eq!(loaded.benchmarks[0].id, "email-1");
    }

    #[test]
    fn test_workbench_report_agrees_with_score() {
        let benchmarks = benchmarks();
        for (source, flags) in [("@", "g"), (r"\.", ""), ("(", ""), ("a", "q")] {
            let result = run_workbench(source, flags, &benchmarks);
            let expected = rxarena_eval::score(source, flags, &all_test_cases(&benchmarks));
            assert_eq!(result.report, expected, "{} /{}", source, flags);
            for case in &result.cases {
                assert_eq!(
                    case.passed,
                    evaluate(&compile(source, flags), &case.case.test)
                );
            }
        }
    }
}
