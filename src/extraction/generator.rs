//! Candidate generation over multi-word token windows.
//!
//! Slides 1–5 token windows across each sentence and matches every window
//! against the pattern library. Matching windows become candidate spans; no
//! deduplication happens here.

use tracing::trace;

use crate::extraction::patterns::PatternLibrary;
use crate::extraction::types::{CandidateSpan, Sentence, Token};

/// Maximum window size in tokens.
pub const MAX_WINDOW: usize = 5;

/// Punctuation attached to the preceding token when reconstructing a
/// window's display string.
const ATTACHED_PUNCT: [&str; 4] = [",", ".", ";", ":"];

/// Reconstruct the display string for a run of tokens, attaching punctuation
/// such as commas and periods to the preceding token without a space, so
/// `Feb . 12 , 2011` reconstructs as `Feb. 12, 2011`.
pub fn window_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    for token in tokens {
        if text.is_empty() || ATTACHED_PUNCT.contains(&token.text.as_str()) {
            text.push_str(&token.text);
        } else {
            text.push(' ');
            text.push_str(&token.text);
        }
    }
    text
}

/// Generates candidate spans for one sentence at a time.
pub struct CandidateGenerator<'a> {
    library: &'a PatternLibrary,
}

impl<'a> CandidateGenerator<'a> {
    /// Create a generator over a compiled pattern library.
    pub fn new(library: &'a PatternLibrary) -> Self {
        Self { library }
    }

    /// Produce all candidate spans for a sentence.
    ///
    /// Windows of size 1 through [`MAX_WINDOW`] are reconstructed and matched
    /// against every pattern. Every match yields a candidate. Pure: no state
    /// beyond the generation counter, no failure modes.
    pub fn generate(
        &self,
        document_id: &str,
        sentence: &Sentence,
        next_generation: &mut u64,
    ) -> Vec<CandidateSpan> {
        let tokens = &sentence.tokens;
        let mut candidates = Vec::new();

        for size in 1..=MAX_WINDOW.min(tokens.len()) {
            for start in 0..=(tokens.len() - size) {
                let end = start + size - 1;
                let window = window_text(&tokens[start..=end]);
                if self.library.is_match(&window) {
                    trace!(sentence = sentence.index, start, end, %window, "candidate");
                    candidates.push(CandidateSpan {
                        document_id: document_id.to_string(),
                        sentence_index: sentence.index,
                        token_start: start,
                        token_end: end,
                        generation: *next_generation,
                    });
                    *next_generation += 1;
                }
            }
        }

        candidates
    }
}
