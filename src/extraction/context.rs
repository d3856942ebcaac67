//! Cross-sentence completion of partially-resolved dates.
//!
//! A single forward pass over all finalized time expressions in document
//! order, carrying the last successfully resolved year and month. Partial
//! triples are completed from same-sentence lookahead, lexical cues in the
//! text immediately preceding the span, and the rolling state. Failure to
//! construct a date leaves the expression untouched and the rolling state
//! unchanged.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::extraction::resolver::ResolverPolicy;
use crate::extraction::types::{DateResolution, TimeExpression};

/// How many characters of preceding text the lexical cue rules inspect.
const CUE_WINDOW: usize = 18;

/// Rolling document state: the last resolved year and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingContext {
    pub last_year: Option<i32>,
    pub last_month: Option<u32>,
}

impl RollingContext {
    /// Seed the rolling state from an optional reference date.
    pub fn seeded(reference: Option<NaiveDate>) -> Self {
        Self {
            last_year: reference.map(|d| d.year()),
            last_month: reference.map(|d| d.month()),
        }
    }

    fn absorb(&mut self, date: NaiveDate) {
        self.last_year = Some(date.year());
        self.last_month = Some(date.month());
    }
}

/// Run the completion pass over a document's expressions, in document order.
///
/// The fold threads [`RollingContext`] through every expression: fully
/// resolved expressions update it, partial ones consult it. Returns the
/// final rolling state.
pub fn carry(
    expressions: &mut [TimeExpression],
    text: &str,
    reference: Option<NaiveDate>,
    policy: &ResolverPolicy,
) -> RollingContext {
    let mut state = RollingContext::seeded(reference);

    for i in 0..expressions.len() {
        state = step(state, expressions, i, text, policy);
    }

    state
}

/// Process one expression, returning the updated rolling state.
fn step(
    mut state: RollingContext,
    expressions: &mut [TimeExpression],
    index: usize,
    text: &str,
    policy: &ResolverPolicy,
) -> RollingContext {
    let expr = &expressions[index];

    match expr.resolution {
        DateResolution::Resolved { date } => {
            state.absorb(date);
            return state;
        }
        DateResolution::Unresolved => return state,
        DateResolution::Partial { .. } => {}
    }

    let mut partial = match expressions[index].resolution.partial() {
        Some(p) => p,
        None => return state,
    };
    let start = expressions[index].start;
    let sentence = expressions[index].sentence_index;
    // Branch selection below keys on whether the span itself parsed a year,
    // not on what the completion steps fill in.
    let parsed_year = partial.year.is_some();

    // Missing year: nearest later same-sentence span with a known year,
    // falling back to the rolling year.
    if partial.year.is_none() {
        partial.year = expressions[index + 1..]
            .iter()
            .filter(|e| e.sentence_index == sentence)
            .find_map(|e| e.resolution.known_year())
            .or(state.last_year);
    }

    if partial.month.is_none() {
        if parsed_year {
            // "beginning/end of the year" style cues before the span.
            if let Some(month) = month_cue(preceding(text, start)) {
                partial.month = Some(month);
                partial.day = partial.day.or(Some(1));
            }
        } else if partial.day.is_some() {
            partial.month = state.last_month;
        }
    }

    // "beginning/end/middle of the month" cues, keyed on the month.
    if partial.day.is_none() {
        if let Some(month) = partial.month {
            partial.day = day_cue(preceding(text, start), month, policy);
        }
    }

    // A known year and month are enough: the day defaults to the 1st.
    if partial.year.is_some() && partial.month.is_some() && partial.day.is_none() {
        partial.day = Some(1);
    }

    // Only a successful construction is written back; otherwise the
    // expression keeps its original triple and the state is unchanged.
    if let Some(date) = partial.to_date() {
        debug!(
            id = %expressions[index].id,
            %date,
            "completed partial date from context"
        );
        expressions[index].resolution = DateResolution::Resolved { date };
        state.absorb(date);
    }

    state
}

/// The lowercased text window immediately preceding a span.
fn preceding(text: &str, start: usize) -> String {
    let from = start.saturating_sub(CUE_WINDOW);
    // Walk back to a character boundary.
    let from = (0..=from).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
    text.get(from..start).unwrap_or("").to_lowercase()
}

/// Month implied by a lexical cue before a year-only span.
fn month_cue(window: String) -> Option<u32> {
    if window.contains("beginning of") || window.contains("start of") || window.contains("early") {
        Some(1)
    } else if window.contains("middle of") || window.contains("mid") {
        Some(6)
    } else if window.contains("end of") || window.contains("late") {
        Some(12)
    } else {
        None
    }
}

/// Day implied by a lexical cue, keyed on the resolved month.
fn day_cue(window: String, month: u32, policy: &ResolverPolicy) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    if window.contains("beginning of") || window.contains("start of") || window.contains("early") {
        Some(1)
    } else if window.contains("middle of") || window.contains("mid") {
        Some(15)
    } else if window.contains("end of") || window.contains("late") {
        Some(policy.month_days[(month - 1) as usize])
    } else {
        None
    }
}
