//! Relative-date evaluation.
//!
//! A pure function mapping (expression text, relation, reference date) to a
//! concrete date using fixed approximations: a year is 365 days, a quarter
//! 12 weeks, a month 30 days, a week 7 days, day-part nouns one day; hours
//! and minutes are exact.

use chrono::{Duration, NaiveDate};

use crate::extraction::numbers::parse_magnitude;

/// Relation between a relative expression and its reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Before,
    After,
    Other,
}

/// Vagueness qualifiers stripped without altering the computed value.
const VAGUE_QUALIFIERS: [&str; 8] = [
    "around",
    "about",
    "roughly",
    "nearly",
    "over",
    "approx",
    "approximately",
    "approximate",
];

/// Calendar units the evaluator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
}

impl Unit {
    /// Match a token against a unit name, with optional plural and common
    /// abbreviations. Day-part nouns count as one day.
    fn from_word(word: &str) -> Option<Unit> {
        let w = word.trim_end_matches(|c: char| !c.is_alphanumeric());
        let w = w.strip_suffix('s').unwrap_or(w);
        match w {
            "year" | "yr" => Some(Unit::Year),
            "quarter" => Some(Unit::Quarter),
            "month" | "mo" => Some(Unit::Month),
            "week" | "wk" => Some(Unit::Week),
            "day" | "morning" | "afternoon" | "evening" | "night" => Some(Unit::Day),
            "hour" | "hr" => Some(Unit::Hour),
            "minute" | "min" => Some(Unit::Minute),
            _ => None,
        }
    }

    /// Approximate length in days for day-based units.
    fn days(self) -> f64 {
        match self {
            Unit::Year => 365.0,
            Unit::Quarter => 84.0,
            Unit::Month => 30.0,
            Unit::Week => 7.0,
            Unit::Day => 1.0,
            Unit::Hour | Unit::Minute => 0.0,
        }
    }
}

/// Evaluate a relative expression against a reference date.
///
/// "after" adds the computed delta, "before" subtracts it, any other
/// relation returns the reference unchanged. An expression with no
/// recognizable calendar unit also returns the reference unchanged.
pub fn evaluate(expression: &str, relation: Relation, reference: NaiveDate) -> NaiveDate {
    if relation == Relation::Other {
        return reference;
    }

    let lowered = expression.to_lowercase();
    let mut words: Vec<&str> = lowered.split_whitespace().collect();
    if let Some(first) = words.first() {
        if VAGUE_QUALIFIERS.contains(first) {
            words.remove(0);
        }
    }

    let found = words
        .iter()
        .enumerate()
        .find_map(|(i, w)| Unit::from_word(w).map(|u| (i, u)));
    let (unit_index, unit) = match found {
        Some(found) => found,
        None => return reference,
    };

    let mut magnitude = magnitude_before(&words[..unit_index]);

    // Trailing "and a half" / "and a quarter" after the unit.
    match words.get(unit_index + 1..unit_index + 4) {
        Some(["and", "a", "half"]) => magnitude += 0.5,
        Some(["and", "a", "quarter"]) => magnitude += 0.25,
        _ => {}
    }

    let delta = match unit {
        Unit::Hour => Duration::minutes((magnitude * 60.0).round() as i64),
        Unit::Minute => Duration::minutes(magnitude.round() as i64),
        _ => Duration::days((magnitude * unit.days()).floor() as i64),
    };

    let midnight = reference.and_time(chrono::NaiveTime::MIN);
    let shifted = match relation {
        Relation::After => midnight + delta,
        Relation::Before => midnight - delta,
        Relation::Other => midnight,
    };
    shifted.date()
}

/// Extract the magnitude from the words preceding the unit.
fn magnitude_before(words: &[&str]) -> f64 {
    let Some(&last) = words.last() else {
        return 1.0;
    };
    let len = words.len();

    // "three and a half", "2 and a half"
    if len >= 3 && last == "half" && words[len - 2] == "a" {
        let base = if len >= 4 && words[len - 3] == "and" {
            parse_magnitude(words[len - 4]).unwrap_or(1.0)
        } else {
            0.0
        };
        return base + 0.5;
    }

    // "three to four": a to-range takes the upper bound.
    if len >= 3 && words[len - 2] == "to" {
        if let Some(upper) = parse_magnitude(last) {
            return upper;
        }
    }

    // "3-5": a numeric dash-range takes the lower bound. Spelled compounds
    // like "twenty-one" are not ranges.
    if let Some((lower, upper)) = last.split_once('-') {
        let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if numeric(lower) && numeric(upper) {
            if let Some(lower) = parse_magnitude(lower) {
                return lower;
            }
        }
    }

    if let Some(value) = parse_magnitude(last) {
        // "3 and 3/4": an "and"-joined pair sums both parts.
        if len >= 3 && words[len - 2] == "and" {
            if let Some(base) = parse_magnitude(words[len - 3]) {
                return base + value;
            }
        }
        return value;
    }

    1.0
}

/// Parse an age surface ("77 years old", "6 months old", "77-year-old")
/// into years.
pub fn age_in_years(surface: &str) -> Option<f32> {
    let lowered = surface.to_lowercase().replace('-', " ");
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let unit_index = words.iter().position(|w| Unit::from_word(w).is_some())?;
    let unit = Unit::from_word(words[unit_index])?;
    let magnitude = magnitude_before(&words[..unit_index]);

    let years = match unit {
        Unit::Year => magnitude,
        Unit::Month => magnitude / 12.0,
        Unit::Week => magnitude / 52.0,
        Unit::Day => magnitude / 365.0,
        _ => return None,
    };
    Some(years as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_after() {
        assert_eq!(
            evaluate("3 days", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 4)
        );
    }

    #[test]
    fn test_year_and_a_half_before() {
        // 365 * 1.5 = 547.5, floored to 547 days.
        assert_eq!(
            evaluate("a year and a half", Relation::Before, date(2020, 1, 1)),
            date(2018, 7, 3)
        );
    }

    #[test]
    fn test_other_relation_is_identity() {
        assert_eq!(
            evaluate("3 days", Relation::Other, date(2020, 1, 1)),
            date(2020, 1, 1)
        );
    }

    #[test]
    fn test_vague_qualifier_stripped() {
        assert_eq!(
            evaluate("about 2 weeks", Relation::After, date(2020, 1, 1)),
            evaluate("2 weeks", Relation::After, date(2020, 1, 1))
        );
        assert_eq!(
            evaluate("approximately one month", Relation::Before, date(2020, 3, 1)),
            date(2020, 1, 31)
        );
    }

    #[test]
    fn test_spelled_magnitudes() {
        assert_eq!(
            evaluate("three weeks", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 22)
        );
        assert_eq!(
            evaluate("twenty-one days", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 22)
        );
    }

    #[test]
    fn test_joined_magnitudes() {
        // "three and a half weeks" = 24.5 days, floored to 24.
        assert_eq!(
            evaluate("three and a half weeks", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 25)
        );
        // "3 and 3/4 weeks" = 26.25 days, floored to 26.
        assert_eq!(
            evaluate("3 and 3/4 weeks", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 27)
        );
    }

    #[test]
    fn test_ranges() {
        // Dash-range takes the lower bound.
        assert_eq!(
            evaluate("3-5 days", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 4)
        );
        // To-range takes the upper bound.
        assert_eq!(
            evaluate("three to four days", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 5)
        );
    }

    #[test]
    fn test_bare_unit_counts_one() {
        assert_eq!(
            evaluate("week", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 8)
        );
        assert_eq!(
            evaluate("the next morning", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 2)
        );
    }

    #[test]
    fn test_quarter_is_twelve_weeks() {
        assert_eq!(
            evaluate("a quarter", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 1) + Duration::days(84)
        );
    }

    #[test]
    fn test_hours_are_exact() {
        // Three hours before midnight lands on the previous day.
        assert_eq!(
            evaluate("3 hours", Relation::Before, date(2020, 1, 1)),
            date(2019, 12, 31)
        );
        // Three hours after midnight stays on the same day.
        assert_eq!(
            evaluate("3 hours", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 1)
        );
    }

    #[test]
    fn test_no_unit_is_identity() {
        assert_eq!(
            evaluate("soon", Relation::After, date(2020, 1, 1)),
            date(2020, 1, 1)
        );
    }

    #[test]
    fn test_age_in_years() {
        assert_eq!(age_in_years("77 years old"), Some(77.0));
        assert_eq!(age_in_years("77-year-old"), Some(77.0));
        assert_eq!(age_in_years("6 months old"), Some(0.5));
        assert_eq!(age_in_years("swelling"), None);
    }
}
