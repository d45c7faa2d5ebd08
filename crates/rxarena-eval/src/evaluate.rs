//! Judging labeled test cases.

use crate::compile::{CompileError, CompiledMatcher};
use crate::execute::execute;

/// A labeled input: the text and whether the pattern is expected to match it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub id: String,
    pub input: String,
    pub should_match: bool,
    /// Captures the author expects to see. Shown alongside results, never
    /// used to decide pass or fail.
    pub expected_captures: Option<Vec<String>>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, input: impl Into<String>, should_match: bool) -> Self {
        Self {
            id: id.into(),
            input: input.into(),
            should_match,
            expected_captures: None,
        }
    }

    pub fn with_captures(mut self, captures: Vec<String>) -> Self {
        self.expected_captures = Some(captures);
        self
    }
}

/// Whether `test` passes under `matcher`. A pattern that failed to compile
/// fails every case.
pub fn evaluate(matcher: &Result<CompiledMatcher, CompileError>, test: &TestCase) -> bool {
    match matcher {
        Ok(matcher) => execute(matcher, &test.input).matched == test.should_match,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;

    #[test]
    fn test_expected_match_passes() {
        let matcher = compile(r"^\d+$", "");
        assert!(evaluate(&matcher, &TestCase::new("1", "123", true)));
    }

    #[test]
    fn test_expected_reject_passes() {
        let matcher = compile(r"^\d+$", "");
        assert!(evaluate(&matcher, &TestCase::new("1", "12a", false)));
    }

    #[test]
    fn test_mismatch_fails() {
        let matcher = compile(r"^\d+$", "");
        assert!(!evaluate(&matcher, &TestCase::new("1", "abc", true)));
        assert!(!evaluate(&matcher, &TestCase::new("2", "42", false)));
    }

    #[test]
    fn test_compile_error_fails_regardless_of_expectation() {
        let matcher = compile("(", "");
        assert!(!evaluate(&matcher, &TestCase::new("1", "x", true)));
        assert!(!evaluate(&matcher, &TestCase::new("2", "x", false)));
    }

    #[test]
    fn test_expected_captures_ignored() {
        let matcher = compile(r"(?<n>\d+)", "");
        let test = TestCase::new("1", "abc 42", true).with_captures(vec!["99".to_string()]);
        assert!(evaluate(&matcher, &test));
    }
}
