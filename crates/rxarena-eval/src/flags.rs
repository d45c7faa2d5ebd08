//! Flag sets and pattern literals.

use crate::compile::{CompileError, CompiledMatcher};
use std::fmt;
use std::str::FromStr;

/// The matching modes a pattern can be compiled with.
///
/// Parsed from the usual single-letter alphabet `gimsuy`. Repeated letters
/// collapse; anything else is rejected with [`CompileError::InvalidFlag`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlagSet {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn set(&mut self, flag: char) -> Result<(), CompileError> {
        match flag {
            'g' => self.global = true,
            'i' => self.ignore_case = true,
            'm' => self.multiline = true,
            's' => self.dot_all = true,
            'u' => self.unicode = true,
            'y' => self.sticky = true,
            _ => return Err(CompileError::InvalidFlag { flag }),
        }
        Ok(())
    }
}

impl FromStr for FlagSet {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = FlagSet::new();
        for c in s.chars() {
            flags.set(c)?;
        }
        Ok(flags)
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ];
        for (on, letter) in letters {
            if on {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

/// A pattern source paired with a validated flag set.
///
/// Displays as a `/source/flags` literal, the form users copy out of the
/// workbench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub source: String,
    pub flags: FlagSet,
}

impl Pattern {
    pub fn new(source: impl Into<String>, flags: &str) -> Result<Self, CompileError> {
        Ok(Self {
            source: source.into(),
            flags: flags.parse()?,
        })
    }

    /// Parse a `/source/flags` literal. The last `/` separates the flags.
    pub fn parse_literal(literal: &str) -> Result<Self, CompileError> {
        let (source, flags) =
            split_literal(literal).ok_or_else(|| CompileError::Syntax {
                message: format!("'{}' is not a /pattern/flags literal", literal),
            })?;
        Self::new(source, flags)
    }

    pub fn compile(&self) -> Result<CompiledMatcher, CompileError> {
        CompiledMatcher::new(&self.source, self.flags)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Split a `/source/flags` literal into its raw parts without validating
/// either of them.
pub fn split_literal(literal: &str) -> Option<(&str, &str)> {
    let rest = literal.strip_prefix('/')?;
    let slash = rest.rfind('/')?;
    Some((&rest[..slash], &rest[slash + 1..]))
}
