//! Conflict resolution between overlapping candidate spans.
//!
//! Reduces the generator's raw candidates into a non-overlapping finalized
//! set per sentence: duplicates are discarded, overlaps are unioned,
//! contained spans are removed, and a small set of lexical heuristics
//! extends spans over adjacent quantity tokens. Each phase builds its
//! next-generation span list explicitly rather than deleting during
//! iteration.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::numbers::is_spelled_digit;
use crate::extraction::types::{CandidateSpan, Token};

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("Invalid regex"));
static FRACTION_OR_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:/\d+)?$").expect("Invalid regex"));
static DASH_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-\d+$").expect("Invalid regex"));

/// Merge raw candidates for one sentence into a finalized, ordered,
/// non-overlapping span set.
pub fn merge_candidates(candidates: Vec<CandidateSpan>, tokens: &[Token]) -> Vec<CandidateSpan> {
    let accepted = accept(candidates);
    let deduped = dedup(accepted);
    let reduced = remove_contained(deduped);
    let extended = extend(reduced, tokens);
    let mut merged = remove_contained(extended);
    merged.sort_by_key(|s| s.token_start);
    merged
}

/// Process candidates against the already-accepted set: exact duplicates are
/// discarded, overlapping spans are replaced by their union, disjoint spans
/// are added.
fn accept(candidates: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    let mut accepted: Vec<CandidateSpan> = Vec::new();

    for candidate in candidates {
        if accepted.iter().any(|a| a.same_span(&candidate)) {
            continue;
        }

        let (overlapping, mut disjoint): (Vec<_>, Vec<_>) =
            accepted.into_iter().partition(|a| a.overlaps(&candidate));

        if overlapping.is_empty() {
            disjoint.push(candidate);
        } else {
            let mut union = candidate;
            for span in overlapping {
                union.token_start = union.token_start.min(span.token_start);
                union.token_end = union.token_end.max(span.token_end);
                union.generation = union.generation.min(span.generation);
            }
            disjoint.push(union);
        }
        accepted = disjoint;
    }

    accepted
}

/// Remove exact duplicate spans, keeping the first occurrence.
fn dedup(spans: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    let mut kept: Vec<CandidateSpan> = Vec::new();
    for span in spans {
        if !kept.iter().any(|k| k.same_span(&span)) {
            kept.push(span);
        }
    }
    kept
}

/// Remove spans that are strict subsets of another span in the same
/// sentence. Boundary-inclusive equality is not removed.
fn remove_contained(spans: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    let snapshot = spans.clone();
    spans
        .into_iter()
        .filter(|s| !snapshot.iter().any(|other| s.strict_subset_of(other)))
        .collect()
}

/// Apply the lexical extension heuristics to every span, first applicable
/// rule in listed order. Left extensions inspect up to two tokens before the
/// span; the right extension handles the "day N" idiom.
fn extend(spans: Vec<CandidateSpan>, tokens: &[Token]) -> Vec<CandidateSpan> {
    let mut result = spans;

    for i in 0..result.len() {
        if let Some(new_start) = left_extension(&result[i], &result, tokens) {
            result[i].token_start = new_start;
        }
        if let Some(new_end) = right_extension(&result[i], &result, tokens) {
            result[i].token_end = new_end;
        }
    }

    result
}

/// Compute a left extension for a span, if any rule applies.
fn left_extension(
    span: &CandidateSpan,
    all: &[CandidateSpan],
    tokens: &[Token],
) -> Option<usize> {
    let start = span.token_start;
    let prev1 = start.checked_sub(1).map(|i| tokens[i].lower());
    let prev2 = start.checked_sub(2).map(|i| tokens[i].lower());

    let claimed = |from: usize| {
        all.iter()
            .filter(|other| !other.same_span(span))
            .any(|other| other.token_end >= from && other.token_start < start)
    };

    let prev1 = prev1.as_deref()?;

    // Conjunction joining two quantities: "12 and 15 December", "3 and a half weeks".
    if let Some(prev2) = prev2.as_deref() {
        let conjunction = (prev1 == "and" && FRACTION_OR_INT.is_match(prev2))
            || ((prev1 == "a" || prev1 == "an") && prev2 == "and");
        if conjunction {
            return (!claimed(start - 2)).then_some(start - 2);
        }
    }

    // Leading fraction or integer with no conjunction: "3 3/4 weeks".
    if FRACTION_OR_INT.is_match(prev1) {
        return (!claimed(start - 1)).then_some(start - 1);
    }

    // Numeric dash-range: "3-5 days".
    if DASH_RANGE.is_match(prev1) {
        return (!claimed(start - 1)).then_some(start - 1);
    }

    // Quantity pair separated by "to" or "-": "3 to 5 days".
    if let Some(prev2) = prev2.as_deref() {
        if (prev1 == "to" || prev1 == "-") && FRACTION_OR_INT.is_match(prev2) {
            return (!claimed(start - 2)).then_some(start - 2);
        }
    }

    None
}

/// Extend a span right by one token for the "day" + trailing digit idiom
/// ("day 1", "day two").
fn right_extension(
    span: &CandidateSpan,
    all: &[CandidateSpan],
    tokens: &[Token],
) -> Option<usize> {
    let end = span.token_end;
    if tokens[end].lower() != "day" {
        return None;
    }

    let next = tokens.get(end + 1)?;
    if !INTEGER.is_match(&next.text) && !is_spelled_digit(&next.text) {
        return None;
    }

    let claimed = all
        .iter()
        .filter(|other| !other.same_span(span))
        .any(|other| other.token_start <= end + 1 && other.token_end > end);
    (!claimed).then_some(end + 1)
}
