//! Compiling pattern sources into matchers.

use crate::flags::FlagSet;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Upper bound on the compiled program size for user-supplied patterns.
const COMPILED_SIZE_LIMIT: usize = 1 << 22;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("invalid pattern: {message}")]
    Syntax { message: String },
    #[error("invalid flag '{flag}' (expected one of g, i, m, s, u, y)")]
    InvalidFlag { flag: char },
}

impl From<regex::Error> for CompileError {
    fn from(err: regex::Error) -> Self {
        let message = match err {
            regex::Error::Syntax(msg) => msg,
            regex::Error::CompiledTooBig(limit) => {
                format!("compiled pattern exceeds the size limit of {} bytes", limit)
            }
            other => other.to_string(),
        };
        CompileError::Syntax { message }
    }
}

/// The executable form of a pattern.
///
/// A matcher is owned by whoever compiled it and is never mutated, so it can
/// be dropped and rebuilt freely on every edit.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    pub(crate) regex: Regex,
    pub(crate) flags: FlagSet,
    pub(crate) group_names: Vec<String>,
}

impl CompiledMatcher {
    pub fn new(source: &str, flags: FlagSet) -> Result<Self, CompileError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(flags.ignore_case)
            .multi_line(flags.multiline)
            .dot_matches_new_line(flags.dot_all)
            .crlf(true)
            .size_limit(COMPILED_SIZE_LIMIT)
            .build()?;

        let group_names = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();

        Ok(Self {
            regex,
            flags,
            group_names,
        })
    }

    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn flags(&self) -> FlagSet {
        self.flags
    }

    /// Named capture groups in the order they appear in the source.
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }
}

/// Compile `source` under the flag letters in `flags`.
///
/// Classes such as `\d`, `\w` and `\b` are Unicode-aware whether or not `u`
/// is given, so `^\d+$` also accepts non-ASCII digits like `٣`. Use `[0-9]`
/// for ASCII-only matching.
pub fn compile(source: &str, flags: &str) -> Result<CompiledMatcher, CompileError> {
    let flags: FlagSet = flags.parse()?;
    CompiledMatcher::new(source, flags)
}
