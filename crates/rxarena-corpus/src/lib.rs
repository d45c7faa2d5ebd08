//! Benchmark and candidate file parser.
//!
//! Parses `.txt` corpus files into benchmarks and candidates using winnow.
//!
//! # Benchmark files
//!
//! ```text
//! ===
//! Basic Email Format
//! ===
//! Validates standard email addresses
//! ---
//! + user@example.com
//! - invalid@
//! + john.doe@mail.org
//!   > john.doe
//! ```
//!
//! `+` marks an input the pattern should match, `-` one it should not. One
//! space after the marker is dropped and the rest of the line is the input,
//! kept verbatim. Indented `>` lines list the captures the author expects
//! for the case above them; they are informational only.
//!
//! # Candidate files
//!
//! ```text
//! ===
//! Simple
//! ===
//! /^\S+@\S+$/
//! ---
//! Anything around an @ sign.
//! ```

use rxarena_eval::{split_literal, TestCase};
use std::path::{Path, PathBuf};
use thiserror::Error;
use winnow::combinator::{alt, cut_err, eof, opt, peek, preceded, repeat};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

// ============ Data Types ============

/// A test case together with the line it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub test: TestCase,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cases: Vec<Case>,
    pub file_path: PathBuf,
    pub start_line: usize,
}

impl Benchmark {
    pub fn test_cases(&self) -> Vec<TestCase> {
        self.cases.iter().map(|c| c.test.clone()).collect()
    }
}

/// A pattern offered for ranking. Flags are kept as written so that a bad
/// flag shows up as a compile failure when the candidate is scored.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub source: String,
    pub flags: String,
    pub explanation: Option<String>,
    pub file_path: PathBuf,
    pub start_line: usize,
}

impl Candidate {
    pub fn literal(&self) -> String {
        format!("/{}/{}", self.source, self.flags)
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

// ============ Public API ============

pub fn parse_benchmark_file(path: &Path) -> Result<Vec<Benchmark>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_benchmarks(&content, path)
}

pub fn parse_benchmarks(content: &str, path: &Path) -> Result<Vec<Benchmark>, ParseError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("benchmark");

    let mut input = content;
    let raw = match benchmark_file.parse_next(&mut input) {
        Ok(raw) => raw,
        Err(e) => return Err(parse_error(content, input, e)),
    };
    if !input.is_empty() {
        return Err(leftover_error(content, input, "expected '===' header"));
    }

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, bench)| {
            let id = format!("{}-{}", stem, i + 1);
            let cases = bench
                .cases
                .into_iter()
                .enumerate()
                .map(|(j, case)| {
                    let mut test =
                        TestCase::new(format!("{}/{}", id, j + 1), case.input, case.should_match);
                    if !case.captures.is_empty() {
                        test = test.with_captures(case.captures);
                    }
                    Case {
                        test,
                        line: line_at(content, case.remaining),
                    }
                })
                .collect();
            Benchmark {
                id,
                name: bench.name,
                description: bench.description,
                cases,
                file_path: path.to_path_buf(),
                start_line: line_at(content, bench.remaining),
            }
        })
        .collect())
}

pub fn parse_candidate_file(path: &Path) -> Result<Vec<Candidate>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_candidates(&content, path)
}

/// Candidates get ids `candidate-1`, `candidate-2`, ... in file order.
pub fn parse_candidates(content: &str, path: &Path) -> Result<Vec<Candidate>, ParseError> {
    let mut input = content;
    let raw = match candidate_file.parse_next(&mut input) {
        Ok(raw) => raw,
        Err(e) => return Err(parse_error(content, input, e)),
    };
    if !input.is_empty() {
        return Err(leftover_error(content, input, "expected '===' header"));
    }

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, cand)| Candidate {
            id: format!("candidate-{}", i + 1),
            name: cand.name,
            source: cand.source,
            flags: cand.flags,
            explanation: cand.explanation,
            file_path: path.to_path_buf(),
            start_line: line_at(content, cand.remaining),
        })
        .collect())
}

// ============ Error Reporting ============

/// Line number of the position `remaining` bytes before the end of `content`.
fn line_at(content: &str, remaining: usize) -> usize {
    let consumed = content.len().saturating_sub(remaining);
    content[..consumed].matches('\n').count() + 1
}

fn current_line(input: &str) -> &str {
    input.lines().next().unwrap_or("").trim_end()
}

fn parse_error(content: &str, input: &str, err: ErrMode<ContextError>) -> ParseError {
    let message = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => {
            let expected = ctx.to_string();
            if expected.is_empty() {
                "unexpected input".to_string()
            } else {
                expected
            }
        }
        ErrMode::Incomplete(_) => "unexpected end of input".to_string(),
    };
    leftover_error(content, input, &message)
}

fn leftover_error(content: &str, input: &str, message: &str) -> ParseError {
    let found = current_line(input);
    let message = if input.is_empty() {
        format!("{}, found end of file", message)
    } else {
        format!("{}, found '{}'", message, found)
    };
    ParseError::Parse {
        line: line_at(content, input.len()),
        message,
    }
}

// ============ Raw Blocks ============

struct RawCase {
    should_match: bool,
    input: String,
    captures: Vec<String>,
    remaining: usize,
}

struct RawBenchmark {
    name: String,
    description: String,
    cases: Vec<RawCase>,
    remaining: usize,
}

struct RawCandidate {
    name: String,
    source: String,
    flags: String,
    explanation: Option<String>,
    remaining: usize,
}

// ============ Winnow Parsers ============

fn newline(input: &mut &str) -> ModalResult<()> {
    alt(("\r\n".value(()), "\n".value(()), "\r".value(()))).parse_next(input)
}

fn opt_newline(input: &mut &str) -> ModalResult<()> {
    opt(newline).map(|_| ()).parse_next(input)
}

fn line_end(input: &mut &str) -> ModalResult<()> {
    let _ = take_while(0.., [' ', '\t']).parse_next(input)?;
    alt((newline, eof.void())).parse_next(input)
}

fn header_sep(input: &mut &str) -> ModalResult<()> {
    (take_while(3.., '='), line_end).void().parse_next(input)
}

fn dash_sep(input: &mut &str) -> ModalResult<()> {
    (take_while(3.., '-'), line_end).void().parse_next(input)
}

fn line_content<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(0.., |c| c == '\n' || c == '\r').parse_next(input)
}

fn blank_line(input: &mut &str) -> ModalResult<()> {
    (take_while(0.., [' ', '\t']), newline)
        .map(|_| ())
        .parse_next(input)
}

fn skip_blank_lines(input: &mut &str) -> ModalResult<()> {
    repeat(0.., blank_line)
        .map(|_: Vec<()>| ())
        .parse_next(input)
}

fn name_line(input: &mut &str) -> ModalResult<String> {
    let content = line_content.parse_next(input)?;
    opt_newline.parse_next(input)?;
    Ok(content.trim().to_string())
}

fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '=')
}

fn is_dash_line(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

/// Free text lines up to (not including) the next separator line.
fn text_block(input: &mut &str, stop_at_dash: bool) -> ModalResult<String> {
    let mut lines = Vec::new();

    loop {
        if input.is_empty() {
            break;
        }

        let peek_line = input.lines().next().unwrap_or("");
        if is_header_line(peek_line) || (stop_at_dash && is_dash_line(peek_line)) {
            break;
        }

        let line = line_content.parse_next(input)?;
        opt_newline.parse_next(input)?;
        lines.push(line.trim_end());
    }

    while lines.last() == Some(&"") {
        lines.pop();
    }
    while lines.first() == Some(&"") {
        lines.remove(0);
    }

    Ok(lines.join("\n"))
}

fn description_block(input: &mut &str) -> ModalResult<String> {
    text_block(input, true)
}

fn explanation_block(input: &mut &str) -> ModalResult<String> {
    text_block(input, false)
}

fn capture_line(input: &mut &str) -> ModalResult<String> {
    let _ = take_while(1.., [' ', '\t']).parse_next(input)?;
    '>'.parse_next(input)?;
    let _ = opt(' ').parse_next(input)?;
    let content = line_content.parse_next(input)?;
    opt_newline.parse_next(input)?;
    Ok(content.to_string())
}

fn case_entry(input: &mut &str) -> ModalResult<RawCase> {
    skip_blank_lines.parse_next(input)?;
    let remaining = input.len();

    let should_match = alt(('+'.value(true), '-'.value(false))).parse_next(input)?;
    let _ = opt(' ').parse_next(input)?;
    let text = line_content.parse_next(input)?;
    opt_newline.parse_next(input)?;

    let captures: Vec<String> = repeat(0.., capture_line).parse_next(input)?;

    Ok(RawCase {
        should_match,
        input: text.to_string(),
        captures,
        remaining,
    })
}

fn benchmark(input: &mut &str) -> ModalResult<RawBenchmark> {
    skip_blank_lines.parse_next(input)?;
    let remaining = input.len();

    // Opening ===
    header_sep.parse_next(input)?;

    let name = name_line.parse_next(input)?;

    // Closing ===
    cut_err(header_sep)
        .context(StrContext::Expected(StrContextValue::Description(
            "closing '===' header",
        )))
        .parse_next(input)?;

    let description = description_block.parse_next(input)?;

    // ---
    cut_err(dash_sep)
        .context(StrContext::Expected(StrContextValue::Description(
            "'---' before the cases",
        )))
        .parse_next(input)?;

    let cases: Vec<RawCase> = repeat(0.., case_entry).parse_next(input)?;

    skip_blank_lines.parse_next(input)?;
    cut_err(alt((eof.void(), peek(header_sep))))
        .context(StrContext::Expected(StrContextValue::Description(
            "'+' or '-' case line",
        )))
        .parse_next(input)?;

    Ok(RawBenchmark {
        name,
        description,
        cases,
        remaining,
    })
}

fn benchmark_file(input: &mut &str) -> ModalResult<Vec<RawBenchmark>> {
    skip_blank_lines.parse_next(input)?;
    let benchmarks: Vec<RawBenchmark> = repeat(0.., benchmark).parse_next(input)?;
    skip_blank_lines.parse_next(input)?;
    Ok(benchmarks)
}

fn literal_line(input: &mut &str) -> ModalResult<(String, String)> {
    let line = line_content
        .map(|l: &str| l.trim_end_matches([' ', '\t']))
        .verify(|l: &str| split_literal(l).is_some())
        .parse_next(input)?;
    opt_newline.parse_next(input)?;
    let (source, flags) = split_literal(line).unwrap_or_default();
    Ok((source.to_string(), flags.to_string()))
}

fn candidate(input: &mut &str) -> ModalResult<RawCandidate> {
    skip_blank_lines.parse_next(input)?;
    let remaining = input.len();

    header_sep.parse_next(input)?;
    let name = name_line.parse_next(input)?;
    cut_err(header_sep)
        .context(StrContext::Expected(StrContextValue::Description(
            "closing '===' header",
        )))
        .parse_next(input)?;

    skip_blank_lines.parse_next(input)?;
    let (source, flags) = cut_err(literal_line)
        .context(StrContext::Expected(StrContextValue::Description(
            "/pattern/flags literal",
        )))
        .parse_next(input)?;

    let explanation = opt(preceded(dash_sep, explanation_block))
        .parse_next(input)?
        .filter(|text| !text.is_empty());

    skip_blank_lines.parse_next(input)?;

    Ok(RawCandidate {
        name,
        source,
        flags,
        explanation,
        remaining,
    })
}

fn candidate_file(input: &mut &str) -> ModalResult<Vec<RawCandidate>> {
    skip_blank_lines.parse_next(input)?;
    let candidates: Vec<RawCandidate> = repeat(0.., candidate).parse_next(input)?;
    skip_blank_lines.parse_next(input)?;
    Ok(candidates)
}
