//! Sentence segmentation and tokenization frontend.
//!
//! The extraction core consumes pre-tokenized sentences with character
//! offsets; producing them is a collaborator's job. This module is a
//! minimal implementation of that contract so the CLI and tests can drive
//! the core on raw text: whitespace tokenization with punctuation split
//! into its own tokens, naive sentence boundaries, and quote
//! normalization. The core never calls into this module.

use crate::extraction::{Sentence, Token};

/// Punctuation split off into standalone tokens.
const SPLIT_PUNCT: [char; 6] = [',', '.', ';', ':', '!', '?'];

/// Sentence-terminating tokens.
const TERMINATORS: [&str; 3] = [".", "!", "?"];

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: [&str; 19] = [
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sept", "sep", "oct", "nov", "dec", "dr",
    "mr", "mrs", "ms", "vs", "approx", "no",
];

/// Normalize quote characters to one canonical form so tokens are literal
/// substrings of the returned text. Run this before [`segment`] and pass
/// the normalized text everywhere.
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}

/// Split text into tokenized sentences with character offsets.
pub fn segment(text: &str) -> Vec<Sentence> {
    let tokens = tokenize(text);
    let mut sentences = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        let terminates = TERMINATORS.contains(&token.text.as_str())
            && !current
                .last()
                .is_some_and(|prev| ABBREVIATIONS.contains(&prev.lower().as_str()));
        current.push(token);

        if terminates {
            sentences.push(Sentence::new(sentences.len(), std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        sentences.push(Sentence::new(sentences.len(), current));
    }

    sentences
}

/// Whitespace tokenization with trailing punctuation split into separate
/// tokens. Every token is a literal substring of `text`.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (word_start, word) in split_whitespace_indices(text) {
        let mut rest = word;
        let mut offset = word_start;

        // Peel leading punctuation.
        while let Some(first) = rest.chars().next() {
            if SPLIT_PUNCT.contains(&first) && rest.len() > first.len_utf8() {
                tokens.push(Token::new(first, offset));
                offset += first.len_utf8();
                rest = &rest[first.len_utf8()..];
            } else {
                break;
            }
        }

        // Peel trailing punctuation. Interior characters are untouched, so
        // forms like "7/28" and "3.5" survive whole.
        let mut trailing: Vec<(char, usize)> = Vec::new();
        while let Some(last) = rest.chars().last() {
            if SPLIT_PUNCT.contains(&last) && rest.len() > last.len_utf8() {
                let cut = rest.len() - last.len_utf8();
                trailing.push((last, offset + cut));
                rest = &rest[..cut];
            } else {
                break;
            }
        }

        if !rest.is_empty() {
            tokens.push(Token::new(rest, offset));
        }
        for (c, at) in trailing.into_iter().rev() {
            tokens.push(Token::new(c, at));
        }
    }

    tokens
}

/// Whitespace splitting that keeps byte offsets.
fn split_whitespace_indices(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_whitespace()
        .scan(0usize, move |cursor, word| {
            let start = text[*cursor..].find(word).map(|i| i + *cursor)?;
            *cursor = start + word.len();
            Some((start, word))
        })
}
