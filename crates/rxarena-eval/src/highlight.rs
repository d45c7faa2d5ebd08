//! Mapping match spans back onto the input for display.

use crate::execute::MatchOutcome;
use std::collections::BTreeMap;

/// One match split into the text before it, the match, and the text after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightView<'a> {
    pub prefix: &'a str,
    pub matched_text: &'a str,
    pub suffix: &'a str,
    pub groups: &'a BTreeMap<String, String>,
}

/// A piece of the input for inline rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    /// Text of the `index`-th span of the outcome.
    Match { index: usize, text: &'a str },
}

/// One view per span of `outcome`. Spans that do not lie on `input` are
/// skipped.
pub fn project<'a>(outcome: &'a MatchOutcome, input: &'a str) -> Vec<HighlightView<'a>> {
    outcome
        .spans
        .iter()
        .filter_map(|span| {
            Some(HighlightView {
                prefix: input.get(..span.start)?,
                matched_text: input.get(span.start..span.end)?,
                suffix: input.get(span.end..)?,
                groups: &span.groups,
            })
        })
        .collect()
}

/// Interleave unmatched and matched text in offset order. Empty matches
/// produce no segment; a span starting before the end of the previous one
/// is dropped.
pub fn segments<'a>(outcome: &MatchOutcome, input: &'a str) -> Vec<Segment<'a>> {
    let mut order: Vec<usize> = (0..outcome.spans.len()).collect();
    order.sort_by_key(|&i| outcome.spans[i].start);

    let mut result = Vec::new();
    let mut last_end = 0;

    for index in order {
        let span = &outcome.spans[index];
        if span.start < last_end || span.is_empty() {
            continue;
        }
        let (Some(before), Some(text)) = (
            input.get(last_end..span.start),
            input.get(span.start..span.end),
        ) else {
            continue;
        };
        if !before.is_empty() {
            result.push(Segment::Plain(before));
        }
        result.push(Segment::Match { index, text });
        last_end = span.end;
    }

    if let Some(rest) = input.get(last_end..) {
        if !rest.is_empty() {
            result.push(Segment::Plain(rest));
        }
    }

    result
}
