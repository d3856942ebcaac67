//! Core data types for temporal annotation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Input Contract
// ============================================================================

/// A single token with its starting character offset in the source text.
///
/// Tokens must be literal substrings of the source (the segmenter normalizes
/// quote characters so offset lookup succeeds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// The token text.
    pub text: String,
    /// Byte offset of the first character in the source text.
    pub start: usize,
}

impl Token {
    /// Create a token at the given offset.
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        Self {
            text: text.into(),
            start,
        }
    }

    /// Inclusive byte offset of the last character.
    pub fn end(&self) -> usize {
        self.start + self.text.len().saturating_sub(1)
    }

    /// Lowercased token text.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// A tokenized sentence with its position in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    /// Zero-based sentence index within the document.
    pub index: usize,
    /// Ordered tokens of the sentence.
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Create a sentence from tokens.
    pub fn new(index: usize, tokens: Vec<Token>) -> Self {
        Self { index, tokens }
    }
}

// ============================================================================
// Candidate Spans
// ============================================================================

/// An unverified pattern match prior to conflict resolution.
///
/// Candidates are created by the generator, expanded or discarded by the
/// merger, and never exposed past that stage. Token indices are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    /// Document the candidate belongs to.
    pub document_id: String,
    /// Sentence index within the document.
    pub sentence_index: usize,
    /// Index of the first token covered.
    pub token_start: usize,
    /// Index of the last token covered (inclusive).
    pub token_end: usize,
    /// Generation counter tracking provenance through merges.
    pub generation: u64,
}

impl CandidateSpan {
    /// Whether this span covers exactly the same tokens as another.
    pub fn same_span(&self, other: &CandidateSpan) -> bool {
        self.token_start == other.token_start && self.token_end == other.token_end
    }

    /// Whether either endpoint of one span falls inside the other.
    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        let inside = |p: usize, s: &CandidateSpan| p >= s.token_start && p <= s.token_end;
        inside(self.token_start, other)
            || inside(self.token_end, other)
            || inside(other.token_start, self)
            || inside(other.token_end, self)
    }

    /// Whether this span is a strict subset of another (boundary-inclusive
    /// equality is not a subset).
    pub fn strict_subset_of(&self, other: &CandidateSpan) -> bool {
        (self.token_start > other.token_start && self.token_end <= other.token_end)
            || (self.token_start >= other.token_start && self.token_end < other.token_end)
    }
}

// ============================================================================
// Temporal Categories
// ============================================================================

/// Semantic category of a temporal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// An age mention ("77 years old").
    Age,
    /// A calendar date, absolute or partial.
    Date,
    /// A relative temporal anchor ("3 days ago", "the next morning").
    Rel,
    /// A duration ("for 3 weeks").
    Dur,
    /// A frequency ("every week").
    Frq,
    /// A temporal-looking span with no anchoring role ("3 week treatment").
    Other,
}

/// Role tag distinguishing anchoring spans from incidental quantities.
///
/// AGE and FRQ spans default to [`Role::Ignore`] so consumers can exclude
/// non-anchoring spans while still observing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Normal,
    Ignore,
}

impl Category {
    /// Default role for this category.
    pub fn default_role(self) -> Role {
        match self {
            Category::Age | Category::Frq => Role::Ignore,
            _ => Role::Normal,
        }
    }
}

// ============================================================================
// Date Resolution
// ============================================================================

/// A year/month/day triple with one or more components unknown, pending
/// contextual completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PartialDate {
    /// A partial date with every component present.
    pub fn full(year: i32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }

    /// True when no component is known.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// Try to build a calendar date from the known components.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }
}

/// Resolution state of a temporal expression.
///
/// The three states are mutually exclusive: a span either carries a full
/// calendar date, a partial triple awaiting contextual completion, or
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DateResolution {
    /// Fully resolved to an absolute calendar date.
    Resolved { date: NaiveDate },
    /// Partially resolved; the carrier may complete it.
    Partial { partial: PartialDate },
    /// No resolution attempted or possible.
    Unresolved,
}

impl DateResolution {
    /// The resolved date, if any.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateResolution::Resolved { date } => Some(*date),
            _ => None,
        }
    }

    /// The partial triple, if any.
    pub fn partial(&self) -> Option<PartialDate> {
        match self {
            DateResolution::Partial { partial } => Some(*partial),
            _ => None,
        }
    }

    /// The year known to this resolution, resolved or partial.
    pub fn known_year(&self) -> Option<i32> {
        match self {
            DateResolution::Resolved { date } => Some(chrono::Datelike::year(date)),
            DateResolution::Partial { partial } => partial.year,
            DateResolution::Unresolved => None,
        }
    }
}

// ============================================================================
// Time Expressions
// ============================================================================

/// A finalized temporal expression.
///
/// Span and category are immutable once finalized; only the resolution may
/// later be populated by the context carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeExpression {
    /// Stable identity.
    pub id: String,
    /// Inclusive byte offset of the first character in the source text.
    pub start: usize,
    /// Inclusive byte offset of the last character in the source text.
    pub end: usize,
    /// Display surface of the span (punctuation attached to the preceding
    /// token, matching what the pattern library saw).
    pub text: String,
    /// Semantic category.
    pub category: Category,
    /// Resolution state.
    pub resolution: DateResolution,
    /// Sentence the span was found in.
    pub sentence_index: usize,
    /// Confidence in [0, 1].
    pub confidence: f32,
    /// Role tag for downstream consumers.
    pub role: Role,
}

impl TimeExpression {
    /// Create an unresolved expression with the category's default role.
    pub fn new(
        start: usize,
        end: usize,
        text: impl Into<String>,
        category: Category,
        sentence_index: usize,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start,
            end,
            text: text.into(),
            category,
            resolution: DateResolution::Unresolved,
            sentence_index,
            confidence: 1.0,
            role: category.default_role(),
        }
    }

    /// Set the resolution state.
    pub fn with_resolution(mut self, resolution: DateResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the confidence score.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Whether this span overlaps another by character offsets.
    pub fn overlaps(&self, other: &TimeExpression) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}
