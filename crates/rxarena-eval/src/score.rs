//! Aggregating test case results into a pass rate.

use crate::compile::{compile, CompileError, CompiledMatcher};
use crate::evaluate::{evaluate, TestCase};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreReport {
    /// Percentage of passing cases, in `[0, 100]`. Zero for an empty set.
    pub pass_rate: f64,
    /// Inputs of the failing cases, in test order. Duplicate inputs are kept.
    pub failed_inputs: Vec<String>,
    pub evaluated_count: usize,
}

impl ScoreReport {
    pub fn passed_count(&self) -> usize {
        self.evaluated_count - self.failed_inputs.len()
    }

    pub fn all_passed(&self) -> bool {
        self.evaluated_count > 0 && self.failed_inputs.is_empty()
    }

    /// Aggregate `(input, passed)` verdicts that were already computed.
    pub fn from_verdicts<'a>(verdicts: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        let mut failed_inputs = Vec::new();
        let mut evaluated_count = 0;
        for (input, passed) in verdicts {
            evaluated_count += 1;
            if !passed {
                failed_inputs.push(input.to_string());
            }
        }

        let passed = evaluated_count - failed_inputs.len();
        let pass_rate = if evaluated_count > 0 {
            100.0 * passed as f64 / evaluated_count as f64
        } else {
            0.0
        };

        ScoreReport {
            pass_rate,
            failed_inputs,
            evaluated_count,
        }
    }
}

/// Compile `source` once and score it against `tests`.
pub fn score(source: &str, flags: &str, tests: &[TestCase]) -> ScoreReport {
    let matcher = compile(source, flags);
    if let Err(e) = &matcher {
        tracing::debug!(source, flags, error = %e, "pattern failed to compile, every case fails");
    }
    score_matcher(&matcher, tests)
}

pub fn score_matcher(
    matcher: &Result<CompiledMatcher, CompileError>,
    tests: &[TestCase],
) -> ScoreReport {
    ScoreReport::from_verdicts(
        tests
            .iter()
            .map(|test| (test.input.as_str(), evaluate(matcher, test))),
    )
}
