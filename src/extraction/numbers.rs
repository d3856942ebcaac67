//! Spelled-out number conversion.
//!
//! Converts textual magnitudes ("three", "twenty-one", "a half") into
//! numeric values for the relative-date evaluator and merger heuristics.

/// Word values for simple number words.
const ONES: &[(&str, f64)] = &[
    ("zero", 0.0),
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
    ("thirteen", 13.0),
    ("fourteen", 14.0),
    ("fifteen", 15.0),
    ("sixteen", 16.0),
    ("seventeen", 17.0),
    ("eighteen", 18.0),
    ("nineteen", 19.0),
];

const TENS: &[(&str, f64)] = &[
    ("twenty", 20.0),
    ("thirty", 30.0),
    ("forty", 40.0),
    ("fifty", 50.0),
    ("sixty", 60.0),
    ("seventy", 70.0),
    ("eighty", 80.0),
    ("ninety", 90.0),
];

/// Articles and vague quantity words that carry a conventional value.
const INDEFINITE: &[(&str, f64)] = &[
    ("a", 1.0),
    ("an", 1.0),
    ("half", 0.5),
    ("couple", 2.0),
    ("few", 3.0),
    ("several", 3.0),
];

/// Convert a single spelled-out number word to its value.
///
/// Handles simple words ("three"), tens ("forty"), hyphenated compounds
/// ("twenty-one") and conventional indefinite quantities ("a", "couple").
pub fn word_value(word: &str) -> Option<f64> {
    let lower = word.to_lowercase();

    for (name, value) in ONES.iter().chain(TENS.iter()).chain(INDEFINITE.iter()) {
        if lower == *name {
            return Some(*value);
        }
    }

    // Hyphenated compounds: twenty-one .. ninety-nine.
    if let Some((tens_word, ones_word)) = lower.split_once('-') {
        let tens = TENS.iter().find(|(name, _)| *name == tens_word)?;
        let ones = ONES.iter().find(|(name, _)| *name == ones_word)?;
        if ones.1 >= 1.0 && ones.1 <= 9.0 {
            return Some(tens.1 + ones.1);
        }
    }

    None
}

/// Whether a word is a spelled-out digit (one through nine).
pub fn is_spelled_digit(word: &str) -> bool {
    let lower = word.to_lowercase();
    ONES.iter()
        .any(|(name, value)| *name == lower && *value >= 1.0 && *value <= 9.0)
}

/// Parse a magnitude token: a plain number ("3", "2.5"), a fraction
/// ("3/4"), or a spelled-out number word.
pub fn parse_magnitude(token: &str) -> Option<f64> {
    let trimmed = token.trim();

    if let Ok(value) = trimmed.parse::<f64>() {
        return Some(value);
    }

    if let Some((num, den)) = trimmed.split_once('/') {
        let num = num.trim().parse::<f64>().ok()?;
        let den = den.trim().parse::<f64>().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
        return None;
    }

    word_value(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(word_value("three"), Some(3.0));
        assert_eq!(word_value("Twelve"), Some(12.0));
        assert_eq!(word_value("ninety"), Some(90.0));
        assert_eq!(word_value("treatment"), None);
    }

    #[test]
    fn test_compounds() {
        assert_eq!(word_value("twenty-one"), Some(21.0));
        assert_eq!(word_value("forty-five"), Some(45.0));
        assert_eq!(word_value("twenty-zero"), None);
    }

    #[test]
    fn test_indefinite() {
        assert_eq!(word_value("a"), Some(1.0));
        assert_eq!(word_value("half"), Some(0.5));
        assert_eq!(word_value("couple"), Some(2.0));
    }

    #[test]
    fn test_parse_magnitude() {
        assert_eq!(parse_magnitude("3"), Some(3.0));
        assert_eq!(parse_magnitude("2.5"), Some(2.5));
        assert_eq!(parse_magnitude("3/4"), Some(0.75));
        assert_eq!(parse_magnitude("three"), Some(3.0));
        assert_eq!(parse_magnitude("3/0"), None);
        assert_eq!(parse_magnitude("soon"), None);
    }

    #[test]
    fn test_spelled_digit() {
        assert!(is_spelled_digit("two"));
        assert!(is_spelled_digit("Nine"));
        assert!(!is_spelled_digit("ten"));
        assert!(!is_spelled_digit("zero"));
    }
}
