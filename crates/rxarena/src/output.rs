use crate::runner::{CandidateResult, CaseResult, WorkbenchResult};
use crate::{Benchmark, Candidate};
use rxarena_eval::{project, segments, Segment};
use serde_json::{json, Value};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const MATCH_COLORS: [Color; 3] = [Color::Cyan, Color::Magenta, Color::Blue];

pub struct Output {
    stdout: StandardStream,
    color: bool,
    dot_count: usize,
}

impl Output {
    pub fn new(color: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(color_choice),
            color,
            dot_count: 0,
        }
    }

    fn set_color(&mut self, color: Color) {
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    }

    fn set_bold(&mut self) {
        let _ = self.stdout.set_color(ColorSpec::new().set_bold(true));
    }

    fn set_dim(&mut self) {
        let _ = self.stdout.set_color(ColorSpec::new().set_dimmed(true));
    }

    fn set_highlight(&mut self, index: usize) {
        let mut color_spec = ColorSpec::new();
        color_spec.set_fg(Some(Color::Black))
            .set_bg(Some(MATCH_COLORS[index % MATCH_COLORS.len()]));
        let _ = self.stdout.set_color(&color_spec);
    }

    fn reset(&mut self) {
        let _ = self.stdout.reset();
    }

    fn print_mark(&mut self, passed: bool) {
        if passed {
            self.set_color(Color::Green);
            write!(self.stdout, "✓").unwrap();
        } else {
            self.set_color(Color::Red);
            write!(self.stdout, "✗").unwrap();
        }
        self.reset();
    }

    fn print_dot(&mut self, passed: bool) {
        if passed {
            self.set_color(Color::Green);
            write!(self.stdout, ".").unwrap();
        } else {
            self.set_color(Color::Red);
            write!(self.stdout, "F").unwrap();
        }
        self.reset();

        self.dot_count += 1;
        if self.dot_count >= 80 {
            writeln!(self.stdout).unwrap();
            self.dot_count = 0;
        }
    }

    fn finish_dots(&mut self) {
        if self.dot_count > 0 {
            writeln!(self.stdout).unwrap();
            self.dot_count = 0;
        }
        writeln!(self.stdout).unwrap();
    }

    /// Write `input` with every match highlighted. Without color the matches
    /// are wrapped in brackets instead.
    fn print_highlighted(&mut self, case: &CaseResult) {
        let input = &case.case.test.input;
        for segment in segments(&case.outcome, input) {
            match segment {
                Segment::Plain(text) => write!(self.stdout, "{}", text).unwrap(),
                Segment::Match { index, text } => {
                    if self.color {
                        self.set_highlight(index);
                        write!(self.stdout, "{}", text).unwrap();
                        self.reset();
                    } else {
                        write!(self.stdout, "[{}]", text).unwrap();
                    }
                }
            }
        }
    }

    fn print_case_line(&mut self, case: &CaseResult) {
        self.print_mark(case.passed);
        let marker = if case.case.test.should_match { '+' } else { '-' };
        write!(self.stdout, " {} {} ", case.case.test.id, marker).unwrap();
        self.print_highlighted(case);
        writeln!(self.stdout).unwrap();
    }

    fn print_case_detail(&mut self, case: &CaseResult) {
        let input = &case.case.test.input;
        for (view, span) in project(&case.outcome, input)
            .iter()
            .zip(&case.outcome.spans)
        {
            self.set_dim();
            write!(self.stdout, "    {}..{}", span.start, span.end).unwrap();
            self.reset();
            write!(self.stdout, " {:?}", view.matched_text).unwrap();
            for (name, value) in view.groups {
                write!(self.stdout, " {}={:?}", name, value).unwrap();
            }
            writeln!(self.stdout).unwrap();
        }
        if let Some(expected) = &case.case.test.expected_captures {
            self.set_dim();
            writeln!(self.stdout, "    expected captures: {}", expected.join(", ")).unwrap();
            self.reset();
        }
    }

    fn describe_failure(case: &CaseResult) -> String {
        if case.outcome.error.is_some() {
            return "pattern did not compile".to_string();
        }
        match (case.case.test.should_match, case.outcome.spans.first()) {
            (true, _) => "expected a match, found none".to_string(),
            (false, Some(span)) => format!(
                "expected no match, matched {:?} at {}..{}",
                case.case.test.input.get(span.start..span.end).unwrap_or_default(),
                span.start,
                span.end
            ),
            (false, None) => "expected no match".to_string(),
        }
    }

    pub fn print_workbench(&mut self, result: &WorkbenchResult, verbose: bool) {
        self.set_bold();
        write!(self.stdout, "{}", result.literal()).unwrap();
        self.reset();
        writeln!(self.stdout).unwrap();

        if let Some(error) = &result.compile_error {
            self.set_color(Color::Red);
            write!(self.stdout, "Error:").unwrap();
            self.reset();
            writeln!(self.stdout, " {}", error).unwrap();
        }
        writeln!(self.stdout).unwrap();

        if verbose {
            let mut current: Option<&str> = None;
            for case in &result.cases {
                if current != Some(case.benchmark_id.as_str()) {
                    if current.is_some() {
                        writeln!(self.stdout).unwrap();
                    }
                    self.set_dim();
                    writeln!(
                        self.stdout,
                        "{} {}",
                        case.benchmark_id,
                        case.file_path.display()
                    )
                    .unwrap();
                    self.reset();
                    current = Some(&case.benchmark_id);
                }
                self.print_case_line(case);
                self.print_case_detail(case);
            }
            writeln!(self.stdout).unwrap();
        } else {
            for case in &result.cases {
                self.print_dot(case.passed);
            }
            self.finish_dots();
        }

        let failed: Vec<&CaseResult> = result.cases.iter().filter(|c| !c.passed).collect();
        if !failed.is_empty() {
            self.set_color(Color::Red);
            self.set_bold();
            writeln!(self.stdout, "Failures:").unwrap();
            self.reset();

            for case in &failed {
                writeln!(self.stdout).unwrap();
                self.print_case_line(case);
                writeln!(
                    self.stdout,
                    "  {}:{}",
                    case.file_path.display(),
                    case.case.line
                )
                .unwrap();
                writeln!(self.stdout, "  {}", Self::describe_failure(case)).unwrap();
            }
            writeln!(self.stdout).unwrap();
        }

        let elapsed_str = format!(" in {:.2}s", result.elapsed.as_secs_f64());
        let report = &result.report;
        if result.passed() {
            self.set_color(Color::Green);
            self.set_bold();
            write!(self.stdout, "All {} cases passed", report.evaluated_count).unwrap();
            self.reset();
            writeln!(self.stdout, "{}", elapsed_str).unwrap();
        } else {
            self.set_bold();
            write!(self.stdout, "Summary:").unwrap();
            self.reset();
            writeln!(
                self.stdout,
                " {} passed, {} failed ({:.0}%){}",
                report.passed_count(),
                report.failed_inputs.len(),
                report.pass_rate,
                elapsed_str
            )
            .unwrap();
        }
    }

    fn set_rate_color(&mut self, pass_rate: f64) {
        let color = if pass_rate >= 90.0 {
            Color::Green
        } else if pass_rate >= 70.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        self.set_color(color);
    }

    pub fn print_arena(&mut self, ranked: &[&CandidateResult], verbose: bool) {
        let width = ranked.len().to_string().len();

        for (rank, result) in ranked.iter().enumerate() {
            write!(self.stdout, "{:>width$}. ", rank + 1, width = width).unwrap();
            self.set_rate_color(result.report.pass_rate);
            write!(self.stdout, "{:>4.0}%", result.report.pass_rate).unwrap();
            self.reset();
            write!(self.stdout, " ").unwrap();
            self.set_bold();
            write!(self.stdout, "{}", result.candidate.name).unwrap();
            self.reset();
            writeln!(
                self.stdout,
                " {} ({}/{})",
                result.candidate.literal(),
                result.report.passed_count(),
                result.report.evaluated_count
            )
            .unwrap();

            let indent = " ".repeat(width + 2);
            if let Some(error) = &result.compile_error {
                self.set_color(Color::Red);
                writeln!(self.stdout, "{}Error: {}", indent, error).unwrap();
                self.reset();
            }

            if verbose {
                for bench in &result.per_benchmark {
                    write!(self.stdout, "{}  ", indent).unwrap();
                    self.print_mark(bench.report.all_passed());
                    writeln!(
                        self.stdout,
                        " {}: {}/{}",
                        bench.name,
                        bench.report.passed_count(),
                        bench.report.evaluated_count
                    )
                    .unwrap();
                }
                if result.compile_error.is_none() {
                    for input in &result.report.failed_inputs {
                        self.set_dim();
                        writeln!(self.stdout, "{}  failed: {:?}", indent, input).unwrap();
                        self.reset();
                    }
                }
                if let Some(explanation) = &result.candidate.explanation {
                    for line in explanation.lines() {
                        writeln!(self.stdout, "{}  {}", indent, line).unwrap();
                    }
                }
                writeln!(self.stdout).unwrap();
            }
        }

        let perfect = ranked.iter().filter(|r| r.passed()).count();
        if !verbose {
            writeln!(self.stdout).unwrap();
        }
        self.set_bold();
        write!(self.stdout, "Summary:").unwrap();
        self.reset();
        writeln!(
            self.stdout,
            " {} candidate(s), {} passing every case",
            ranked.len(),
            perfect
        )
        .unwrap();
    }

    pub fn print_list(&mut self, benchmarks: &[Benchmark], candidates: &[Candidate]) {
        for bench in benchmarks {
            writeln!(self.stdout).unwrap();
            self.set_bold();
            write!(self.stdout, "{}", bench.name).unwrap();
            self.reset();
            self.set_dim();
            writeln!(
                self.stdout,
                " [{}] {}:{}",
                bench.id,
                bench.file_path.display(),
                bench.start_line
            )
            .unwrap();
            self.reset();
            writeln!(self.stdout, "  {} case(s)", bench.cases.len()).unwrap();
            for case in &bench.cases {
                let marker = if case.test.should_match { '+' } else { '-' };
                writeln!(self.stdout, "    {} {}", marker, case.test.input).unwrap();
            }
        }

        if !candidates.is_empty() {
            writeln!(self.stdout).unwrap();
            self.set_bold();
            writeln!(self.stdout, "Candidates").unwrap();
            self.reset();
            for candidate in candidates {
                writeln!(
                    self.stdout,
                    "  - {} {}",
                    candidate.name,
                    candidate.literal()
                )
                .unwrap();
            }
        }
    }

    pub fn print_json(&mut self, value: &Value) {
        writeln!(self.stdout, "{:#}", value).unwrap();
    }
}

// ============ JSON Reports ============

fn report_json(report: &rxarena_eval::ScoreReport) -> Value {
    json!({
        "pass_rate": report.pass_rate,
        "passed": report.passed_count(),
        "evaluated": report.evaluated_count,
        "failed_inputs": report.failed_inputs,
    })
}

pub fn workbench_json(result: &WorkbenchResult) -> Value {
    let cases: Vec<Value> = result
        .cases
        .iter()
        .map(|c| {
            let spans: Vec<Value> = c
                .outcome
                .spans
                .iter()
                .map(|s| json!({ "start": s.start, "end": s.end, "groups": s.groups }))
                .collect();
            json!({
                "id": c.case.test.id,
                "input": c.case.test.input,
                "should_match": c.case.test.should_match,
                "passed": c.passed,
                "matched": c.outcome.matched,
                "spans": spans,
                "file": c.file_path.display().to_string(),
                "line": c.case.line,
            })
        })
        .collect();

    json!({
        "pattern": result.source,
        "flags": result.flags,
        "error": result.compile_error.as_ref().map(|e| e.to_string()),
        "report": report_json(&result.report),
        "cases": cases,
    })
}

pub fn arena_json(ranked: &[&CandidateResult]) -> Value {
    let candidates: Vec<Value> = ranked
        .iter()
        .enumerate()
        .map(|(rank, r)| {
            let per_benchmark: Vec<Value> = r
                .per_benchmark
                .iter()
                .map(|b| {
                    json!({
                        "id": b.benchmark_id,
                        "name": b.name,
                        "report": report_json(&b.report),
                    })
                })
                .collect();
            json!({
                "rank": rank + 1,
                "id": r.candidate.id,
                "name": r.candidate.name,
                "pattern": r.candidate.source,
                "flags": r.candidate.flags,
                "explanation": r.candidate.explanation,
                "error": r.compile_error.as_ref().map(|e| e.to_string()),
                "report": report_json(&r.report),
                "benchmarks": per_benchmark,
            })
        })
        .collect();

    json!({ "candidates": candidates })
}

pub fn list_json(benchmarks: &[Benchmark], candidates: &[Candidate]) -> Value {
    let benchmarks: Vec<Value> = benchmarks
        .iter()
        .map(|b| {
            let cases: Vec<Value> = b
                .cases
                .iter()
                .map(|c| {
                    json!({
                        "id": c.test.id,
                        "input": c.test.input,
                        "should_match": c.test.should_match,
                        "expected_captures": c.test.expected_captures,
                        "line": c.line,
                    })
                })
                .collect();
            json!({
                "id": b.id,
                "name": b.name,
                "description": b.description,
                "file": b.file_path.display().to_string(),
                "cases": cases,
            })
        })
        .collect();
    let candidates: Vec<Value> = candidates
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "pattern": c.source,
                "flags": c.flags,
                "explanation": c.explanation,
            })
        })
        .collect();

    json!({ "benchmarks": benchmarks, "candidates": candidates })
}
