//! Running a compiled matcher over an input string.

use crate::compile::{compile, CompileError, CompiledMatcher};
use std::collections::BTreeMap;

/// A single match: the half-open byte range `[start, end)` of the input and
/// the named groups that took part in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub groups: BTreeMap<String, String>,
}

impl MatchSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    pub matched: bool,
    pub spans: Vec<MatchSpan>,
    pub error: Option<CompileError>,
}

impl MatchOutcome {
    fn from_spans(spans: Vec<MatchSpan>) -> Self {
        Self {
            matched: !spans.is_empty(),
            spans,
            error: None,
        }
    }

    pub fn from_error(error: CompileError) -> Self {
        Self {
            matched: false,
            spans: Vec::new(),
            error: Some(error),
        }
    }
}

/// Find the matches of `matcher` in `input`.
///
/// Without the global flag only the leftmost match is returned. With it,
/// every non-overlapping match is collected, each search resuming where the
/// previous match ended. An empty match pushes the next search one character
/// further along.
pub fn execute(matcher: &CompiledMatcher, input: &str) -> MatchOutcome {
    let flags = matcher.flags;
    let mut spans = Vec::new();
    let mut pos = 0;

    loop {
        let Some(caps) = matcher.regex.captures_at(input, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        if flags.sticky && whole.start() != pos {
            break;
        }

        let groups = matcher
            .group_names
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();
        spans.push(MatchSpan {
            start: whole.start(),
            end: whole.end(),
            groups,
        });

        if !flags.global {
            break;
        }

        // A forced step past an empty match never searches again at the
        // end of the input. A non-empty match ending there still does.
        let stepped = whole.is_empty();
        pos = if stepped {
            next_char_boundary(input, whole.end())
        } else {
            whole.end()
        };
        if stepped && pos >= input.len() {
            break;
        }
    }

    MatchOutcome::from_spans(spans)
}

fn next_char_boundary(input: &str, at: usize) -> usize {
    at + input[at..].chars().next().map_or(1, char::len_utf8)
}

/// Compile and run in one step. A pattern that fails to compile yields an
/// unmatched outcome carrying the error.
pub fn test_pattern(source: &str, flags: &str, input: &str) -> MatchOutcome {
    match compile(source, flags) {
        Ok(matcher) => execute(&matcher, input),
        Err(e) => MatchOutcome::from_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(outcome: &MatchOutcome) -> Vec<(usize, usize)> {
        outcome.spans.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_first_match_only_without_global() {
        let matcher = compile(r"\d+", "").unwrap();
        let outcome = execute(&matcher, "a1 b22 c333");
        assert!(outcome.matched);
        assert_eq!(ranges(&outcome), vec![(1, 2)]);
    }

    #[test]
    fn test_global_dot() {
        let matcher = compile(".", "g").unwrap();
        let outcome = execute(&matcher, "ab");
        assert_eq!(ranges(&outcome), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_global_empty_match_advances() {
        let matcher = compile("a*", "g").unwrap();
        let outcome = execute(&matcher, "b");
        assert_eq!(ranges(&outcome), vec![(0, 0)]);
    }

    #[test]
    fn test_global_empty_input() {
        let matcher = compile("a*", "g").unwrap();
        let outcome = execute(&matcher, "");
        assert_eq!(ranges(&outcome), vec![(0, 0)]);
    }

    #[test]
    fn test_global_mixed_empty_and_nonempty() {
        let matcher = compile("a*", "g").unwrap();
        let outcome = execute(&matcher, "baab");
        assert_eq!(ranges(&outcome), vec![(0, 0), (1, 3), (3, 3)]);
    }

    #[test]
    fn test_global_empty_match_after_match_at_end() {
        let matcher = compile(r"\d*$", "g").unwrap();
        assert_eq!(ranges(&execute(&matcher, "12")), vec![(0, 2), (2, 2)]);

        let matcher = compile("a*", "g").unwrap();
        assert_eq!(
            ranges(&execute(&matcher, "baa")),
            vec![(0, 0), (1, 3), (3, 3)]
        );
    }

    #[test]
    fn test_global_empty_match_steps_over_multibyte_char() {
        let matcher = compile("x*", "g").unwrap();
        let outcome = execute(&matcher, "é!");
        assert_eq!(ranges(&outcome), vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn test_global_word_boundary_at_end() {
        let matcher = compile(r"\b", "g").unwrap();
        let outcome = execute(&matcher, "ab");
        assert_eq!(ranges(&outcome), vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn test_no_match() {
        let matcher = compile(r"\d", "g").unwrap();
        let outcome = execute(&matcher, "abc");
        assert!(!outcome.matched);
        assert!(outcome.spans.is_empty());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_sticky_requires_match_at_start() {
        let matcher = compile(r"\d", "y").unwrap();
        assert!(!execute(&matcher, "a1").matched);
        assert!(execute(&matcher, "1a").matched);
    }

    #[test]
    fn test_sticky_global_stops_at_first_gap() {
        let matcher = compile(r"\d", "gy").unwrap();
        let outcome = execute(&matcher, "12a3");
        assert_eq!(ranges(&outcome), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_named_groups() {
        let matcher = compile(r"(?<year>\d{4})-(?<month>\d{2})", "").unwrap();
        let outcome = execute(&matcher, "on 2024-01-15");
        let span = &outcome.spans[0];
        assert_eq!(span.groups.get("year").map(String::as_str), Some("2024"));
        assert_eq!(span.groups.get("month").map(String::as_str), Some("01"));
    }

    #[test]
    fn test_non_participating_group_omitted() {
        let matcher = compile(r"(?<num>\d+)|(?<word>[a-z]+)", "g").unwrap();
        let outcome = execute(&matcher, "abc 12");
        assert_eq!(outcome.spans.len(), 2);
        assert!(outcome.spans[0].groups.contains_key("word"));
        assert!(!outcome.spans[0].groups.contains_key("num"));
        assert!(outcome.spans[1].groups.contains_key("num"));
        assert!(!outcome.spans[1].groups.contains_key("word"));
    }

    #[test]
    fn test_empty_participating_group_kept() {
        let matcher = compile(r"a(?<tail>b*)", "").unwrap();
        let outcome = execute(&matcher, "a");
        assert_eq!(outcome.spans[0].groups.get("tail").map(String::as_str), Some(""));
    }

    #[test]
    fn test_ignore_case() {
        let matcher = compile("hello", "i").unwrap();
        assert!(execute(&matcher, "HeLLo").matched);
    }

    #[test]
    fn test_multiline_anchors() {
        let matcher = compile("^b$", "m").unwrap();
        assert!(execute(&matcher, "a\nb\nc").matched);
        let matcher = compile("^b$", "").unwrap();
        assert!(!execute(&matcher, "a\nb\nc").matched);
    }

    #[test]
    fn test_dot_all() {
        let matcher = compile("a.b", "").unwrap();
        assert!(!execute(&matcher, "a\nb").matched);
        let matcher = compile("a.b", "s").unwrap();
        assert!(execute(&matcher, "a\nb").matched);
    }

    #[test]
    fn test_repeated_execution_is_identical() {
        let matcher = compile(r"(?<w>\w+)", "g").unwrap();
        let first = execute(&matcher, "one two three");
        let second = execute(&matcher, "one two three");
        assert_eq!(first, second);
    }

    #[test]
    fn test_pattern_reports_compile_error() {
        let outcome = test_pattern("(", "", "anything");
        assert!(!outcome.matched);
        assert!(outcome.spans.is_empty());
        assert!(matches!(outcome.error, Some(CompileError::Syntax { .. })));
    }
}
