//! Pattern evaluation and scoring.
//!
//! Compiles a regular expression with a flag set, runs it over labeled test
//! cases, and reports a pass rate together with the failing inputs. Every
//! function is pure: callers own the pattern, flags and cases, and re-run the
//! pipeline whenever any of them changes.
//!
//! # Example
//!
//! ```
//! use rxarena_eval::{compile, execute, project, score, CompileError, TestCase};
//!
//! let tests = vec![
//!     TestCase::new("1", "user@example.com", true),
//!     TestCase::new("2", "invalid@", false),
//! ];
//! let report = score(r"^[^@\s]+@[^@\s]+\.[a-z]{2,}$", "", &tests);
//! assert_eq!(report.pass_rate, 100.0);
//!
//! let matcher = compile(r"(?<user>\w+)@", "g").unwrap();
//! let outcome = execute(&matcher, "ann@x bob@y");
//! let views = project(&outcome, "ann@x bob@y");
//! assert_eq!(views[1].matched_text, "bob@");
//! assert_eq!(views[1].groups["user"], "bob");
//!
//! // A broken pattern is a value, not a panic.
//! assert!(matches!(compile("(", ""), Err(CompileError::Syntax { .. })));
//! assert_eq!(score("(", "", &tests).pass_rate, 0.0);
//! ```

mod compile;
mod evaluate;
mod execute;
mod flags;
mod highlight;
mod score;

pub use compile::{compile, CompileError, CompiledMatcher};
pub use evaluate::{evaluate, TestCase};
pub use execute::{execute, test_pattern, MatchOutcome, MatchSpan};
pub use flags::{split_literal, FlagSet, Pattern};
pub use highlight::{project, segments, HighlightView, Segment};
pub use score::{score, score_matcher, ScoreReport};
