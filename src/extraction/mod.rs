//! Temporal expression extraction pipeline.
//!
//! Processes pre-tokenized clinical narrative text into finalized
//! [`TimeExpression`] records.
//!
//! # Architecture
//!
//! ```text
//! Tokenized Sentences
//!       │
//!       ▼
//! ┌───────────────────────────────────────────────────────┐
//! │               Temporal Annotator                      │
//! │  ┌───────────┐ ┌────────┐ ┌────────────┐ ┌──────────┐ │
//! │  │ Candidate │→│  Span  │→│    Type    │→│ Absolute │ │
//! │  │ Generator │ │ Merger │ │ Classifier │ │ Resolver │ │
//! │  └───────────┘ └────────┘ └────────────┘ └──────────┘ │
//! │  ┌───────────────────────────────────────────────────┐│
//! │  │           Context Carrier (document pass)         ││
//! │  └───────────────────────────────────────────────────┘│
//! └───────────────────────────────────────────────────────┘
//!       │
//!       ▼
//! TimeExpressions (ordered, non-overlapping)
//! ```
//!
//! The relative-date evaluator in [`relative`] is independent of the
//! pipeline: consumers holding a classified REL/DUR span and a reference
//! date call it directly.

pub mod classifier;
pub mod context;
pub mod generator;
pub mod merger;
pub mod numbers;
pub mod patterns;
pub mod relative;
pub mod resolver;
pub mod types;

pub use context::RollingContext;
pub use patterns::PatternLibrary;
pub use relative::{age_in_years, evaluate, Relation};
pub use resolver::{ResolverOutcome, ResolverPolicy};
pub use types::{
    CandidateSpan, Category, DateResolution, PartialDate, Role, Sentence, TimeExpression, Token,
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use generator::{window_text, CandidateGenerator};
use resolver::ResolvedPart;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the temporal annotator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reference date informing age computation and partial-date defaults.
    pub reference_date: Option<NaiveDate>,
    /// Date-resolution policy constants.
    pub resolver: ResolverPolicy,
}

// ============================================================================
// Results
// ============================================================================

/// Complete annotation result for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnnotation {
    /// The document that was processed.
    pub document_id: String,
    /// Finalized expressions, ordered by start offset.
    pub expressions: Vec<TimeExpression>,
    /// Processing metadata.
    pub metadata: AnnotationMetadata,
}

/// Metadata about one annotation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    /// Number of characters processed.
    pub chars_processed: usize,
    /// Number of sentences processed.
    pub sentences: usize,
    /// Raw candidates produced by the generator.
    pub candidates: usize,
    /// DATE spans dropped because no resolution strategy succeeded.
    pub dropped_spans: usize,
    /// Processing time in milliseconds.
    pub processing_ms: u64,
}

// ============================================================================
// Annotator
// ============================================================================

/// The temporal annotator: generator → merger → classifier → resolver →
/// carrier, over pre-tokenized sentences.
pub struct TemporalAnnotator {
    config: ExtractionConfig,
    patterns: PatternLibrary,
}

impl Default for TemporalAnnotator {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl TemporalAnnotator {
    /// Create an annotator; the pattern library is compiled here, once.
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            patterns: PatternLibrary::new(),
        }
    }

    /// Create an annotator with a specific reference date.
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self::new(ExtractionConfig {
            reference_date: Some(reference_date),
            ..Default::default()
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Annotate one document.
    ///
    /// `text` is the source the token offsets point into; `sentences` is its
    /// tokenization. Sentence-level stages run per sentence; the context
    /// carrier then makes its single ordered pass over the whole document.
    pub fn annotate(
        &self,
        text: &str,
        sentences: &[Sentence],
        document_id: &str,
    ) -> DocumentAnnotation {
        let started = std::time::Instant::now();
        let generator = CandidateGenerator::new(&self.patterns);
        let reference_year = self.config.reference_date.map(|d| d.year());

        let mut next_generation = 0u64;
        let mut candidates_total = 0usize;
        let mut dropped = 0usize;
        let mut expressions: Vec<TimeExpression> = Vec::new();

        for sentence in sentences {
            let candidates = generator.generate(document_id, sentence, &mut next_generation);
            candidates_total += candidates.len();
            let spans = merger::merge_candidates(candidates, &sentence.tokens);

            for span in spans {
                let tokens = &sentence.tokens[span.token_start..=span.token_end];
                let surface = window_text(tokens);
                let preceding: Vec<&str> = sentence.tokens
                    [span.token_start.saturating_sub(3)..span.token_start]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect();
                let following: Vec<&str> = sentence.tokens
                    [(span.token_end + 1).min(sentence.tokens.len())..]
                    .iter()
                    .take(2)
                    .map(|t| t.text.as_str())
                    .collect();

                let category = classifier::classify(&surface, &preceding, &following);
                let start = tokens.first().expect("non-empty span").start;
                let end = tokens.last().expect("non-empty span").end();

                if category != Category::Date {
                    expressions.push(TimeExpression::new(
                        start,
                        end,
                        surface,
                        category,
                        sentence.index,
                    ));
                    continue;
                }

                match resolver::resolve(&surface, reference_year, &self.config.resolver) {
                    None => {
                        // The only point where a classified span is
                        // silently discarded.
                        debug!(%surface, "no resolution strategy succeeded");
                        dropped += 1;
                    }
                    Some(ResolverOutcome::Single {
                        resolution,
                        confidence,
                    }) => {
                        expressions.push(
                            TimeExpression::new(start, end, surface, category, sentence.index)
                                .with_resolution(resolution)
                                .with_confidence(confidence),
                        );
                    }
                    Some(ResolverOutcome::Split {
                        first,
                        second,
                        separator,
                    }) => match split_offsets(tokens, separator) {
                        Some(((s1, e1), (s2, e2))) => {
                            expressions.push(dated_expression(
                                s1,
                                e1,
                                surface[..separator.0].trim_end(),
                                sentence.index,
                                first,
                            ));
                            expressions.push(dated_expression(
                                s2,
                                e2,
                                surface[separator.1..].trim_start(),
                                sentence.index,
                                second,
                            ));
                        }
                        None => {
                            expressions.push(dated_expression(
                                start,
                                end,
                                &surface,
                                sentence.index,
                                first,
                            ));
                        }
                    },
                }
            }
        }

        expressions.sort_by_key(|e| e.start);
        context::carry(
            &mut expressions,
            text,
            self.config.reference_date,
            &self.config.resolver,
        );

        DocumentAnnotation {
            document_id: document_id.to_string(),
            expressions,
            metadata: AnnotationMetadata {
                chars_processed: text.len(),
                sentences: sentences.len(),
                candidates: candidates_total,
                dropped_spans: dropped,
                processing_ms: started.elapsed().as_millis() as u64,
            },
        }
    }
}

/// Build a resolved DATE expression for one half of a split span.
fn dated_expression(
    start: usize,
    end: usize,
    surface: &str,
    sentence_index: usize,
    part: ResolvedPart,
) -> TimeExpression {
    TimeExpression::new(start, end, surface, Category::Date, sentence_index)
        .with_resolution(DateResolution::Resolved { date: part.date })
        .with_confidence(part.confidence)
}

/// Map a separator byte range in the display string back to source
/// character spans for the two halves. The first span retains the original
/// start and ends before the separator; the second starts after it and
/// retains the original end.
fn split_offsets(
    tokens: &[Token],
    separator: (usize, usize),
) -> Option<((usize, usize), (usize, usize))> {
    const ATTACHED_PUNCT: [&str; 4] = [",", ".", ";", ":"];
    let (sep_start, sep_end) = separator;

    let mut first_end = None;
    let mut second_start = None;
    let mut cursor = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        if i > 0 && !ATTACHED_PUNCT.contains(&token.text.as_str()) {
            cursor += 1;
        }
        let display_start = cursor;
        cursor += token.text.len();
        let display_end = cursor;

        if display_end <= sep_start {
            first_end = Some(token.end());
        } else if display_start < sep_start {
            // Separator begins inside this token: split mid-token.
            first_end = Some(token.start + (sep_start - display_start) - 1);
        }

        if second_start.is_none() {
            if display_start >= sep_end {
                second_start = Some(token.start);
            } else if display_end > sep_end {
                second_start = Some(token.start + (sep_end - display_start));
            }
        }
    }

    let first_start = tokens.first()?.start;
    let second_end = tokens.last()?.end();
    Some(((first_start, first_end?), (second_start?, second_end)))
}
