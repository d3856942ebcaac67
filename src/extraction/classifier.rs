//! Contextual type classification for finalized spans.
//!
//! A pure function of (surface text, up to 3 preceding tokens, up to 2
//! following tokens) → category. The decision table is an explicit ranked
//! rule list evaluated in fixed order, first match wins, so rule precedence
//! is an auditable artifact.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::numbers::is_spelled_digit;
use crate::extraction::types::Category;

/// Duration-signal tokens checked one position before the span.
const DURATION_SIGNALS: [&str; 9] = [
    "for",
    "x",
    "over",
    "last",
    "lasting",
    "lasted",
    "persisted",
    "persisting",
    "within",
];

/// Reduced duration-signal subset for "the <signal>" two-back forms.
const DURATION_SIGNALS_AFTER_THE: [&str; 5] =
    ["last", "lasting", "lasted", "persisted", "persisting"];

/// Frequency-signal tokens checked one position before the span.
const FREQUENCY_SIGNALS: [&str; 2] = ["every", "per"];

/// Relative-time signal words checked at span boundaries.
const RELATIVE_SIGNALS: [&str; 9] = [
    "before",
    "after",
    "prior",
    "later",
    "earlier",
    "post",
    "ago",
    "next",
    "following",
];

/// Day-part nouns whose presence marks a span relative.
const DAY_PARTS: [&str; 7] = [
    "same",
    "time",
    "day",
    "morning",
    "afternoon",
    "evening",
    "night",
];

static WEEKDAY_SURFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:next|last|this|following|previous)\s)?(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|weds|wed|thurs|thur|thu|fri|sat|sun)s?$")
        .expect("Invalid regex")
});
static HOSPITAL_DAY_SURFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:hd|pod)\s?#?\s?\d+|(?:hospital|post-?op(?:erative)?)\sday\s?#?\s?\d+)$")
        .expect("Invalid regex")
});
static AGE_SURFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[\s-]old$|^\d+\s?(?:yo|y/o|y\.o\.)$)").expect("Invalid regex")
});
static FREQUENCY_SURFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:daily|weekly|monthly|yearly|annually|hourly|nightly|bi-?weekly|bi-?monthly|(?:once|twice|.+\stimes)\s(?:a|an|per|each)\s.+)$",
    )
    .expect("Invalid regex")
});
static CALENDAR_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:minutes?|mins?|hours?|hrs?|days?|weeks?|wks?|months?|mos?|years?|yrs?|quarters?)\b")
        .expect("Invalid regex")
});
static ORDINAL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|\d+(?:st|nd|rd|th))\b")
        .expect("Invalid regex")
});

/// Bounded lexical context around a span.
struct ClassifierContext {
    surface: String,
    first_word: String,
    last_word: String,
    /// Up to 3 preceding tokens, nearest first.
    prev: Vec<String>,
    /// Up to 2 following tokens, nearest first.
    next: Vec<String>,
}

impl ClassifierContext {
    fn new(surface: &str, preceding: &[&str], following: &[&str]) -> Self {
        let lower = surface.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        Self {
            first_word: words.first().copied().unwrap_or_default().to_string(),
            last_word: words.last().copied().unwrap_or_default().to_string(),
            surface: lower,
            prev: preceding
                .iter()
                .rev()
                .take(3)
                .map(|t| t.to_lowercase())
                .collect(),
            next: following
                .iter()
                .take(2)
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    fn prev1(&self) -> &str {
        self.prev.first().map(String::as_str).unwrap_or_default()
    }

    fn prev2(&self) -> &str {
        self.prev.get(1).map(String::as_str).unwrap_or_default()
    }

    fn next1(&self) -> &str {
        self.next.first().map(String::as_str).unwrap_or_default()
    }

    fn next2(&self) -> &str {
        self.next.get(1).map(String::as_str).unwrap_or_default()
    }
}

type Rule = fn(&ClassifierContext) -> Option<Category>;

/// The ranked decision table. Evaluated in order, first match wins; the
/// fallback category is DATE.
const RULES: &[(&str, Rule)] = &[
    ("age", rule_age),
    ("weekday", rule_weekday),
    ("hospital-day", rule_hospital_day),
    ("frequency-idiom", rule_frequency_idiom),
    ("calendar-unit", rule_calendar_unit),
    ("now", rule_now),
];

fn rule_age(ctx: &ClassifierContext) -> Option<Category> {
    let by_context = ctx.next1() == "old"
        || (ctx.next1() == "of" && ctx.next2() == "age")
        || (ctx.prev2() == "born" && ctx.prev1() == "in")
        || (ctx.prev2() == "age" && ctx.prev1() == "of");
    (by_context || AGE_SURFACE.is_match(&ctx.surface)).then_some(Category::Age)
}

fn rule_weekday(ctx: &ClassifierContext) -> Option<Category> {
    WEEKDAY_SURFACE.is_match(&ctx.surface).then_some(Category::Rel)
}

fn rule_hospital_day(ctx: &ClassifierContext) -> Option<Category> {
    (HOSPITAL_DAY_SURFACE.is_match(&ctx.surface) || ctx.surface.contains("stay"))
        .then_some(Category::Rel)
}

fn rule_frequency_idiom(ctx: &ClassifierContext) -> Option<Category> {
    FREQUENCY_SURFACE.is_match(&ctx.surface).then_some(Category::Frq)
}

/// The calendar-interval table: spans containing a unit noun are DUR, FRQ,
/// REL or OTHER depending on bounded context.
fn rule_calendar_unit(ctx: &ClassifierContext) -> Option<Category> {
    if !CALENDAR_UNIT.is_match(&ctx.surface) {
        return None;
    }

    if DURATION_SIGNALS.contains(&ctx.prev1())
        || (ctx.prev2() == "the" && DURATION_SIGNALS_AFTER_THE.contains(&ctx.prev1()))
    {
        return Some(Category::Dur);
    }

    if FREQUENCY_SIGNALS.contains(&ctx.prev1()) {
        return Some(Category::Frq);
    }

    let relative = RELATIVE_SIGNALS.contains(&ctx.first_word.as_str())
        || RELATIVE_SIGNALS.contains(&ctx.last_word.as_str())
        || ORDINAL_WORD.is_match(&ctx.surface)
        || DAY_PARTS
            .iter()
            .any(|part| ctx.surface.split_whitespace().any(|w| w == *part))
        || ctx.last_word.chars().all(|c| c.is_ascii_digit()) && !ctx.last_word.is_empty()
        || is_spelled_digit(&ctx.last_word);
    if relative {
        return Some(Category::Rel);
    }

    Some(Category::Other)
}

fn rule_now(ctx: &ClassifierContext) -> Option<Category> {
    (ctx.surface == "now").then_some(Category::Rel)
}

/// Classify a span from its surface and bounded context.
///
/// `preceding` holds up to 3 tokens before the span in sentence order;
/// `following` holds up to 2 tokens after it.
pub fn classify(surface: &str, preceding: &[&str], following: &[&str]) -> Category {
    let ctx = ClassifierContext::new(surface, preceding, following);
    for (_name, rule) in RULES {
        if let Some(category) = rule(&ctx) {
            return category;
        }
    }
    Category::Date
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_by_following_old() {
        assert_eq!(classify("77 years", &[], &["old", "male"]), Category::Age);
        assert_eq!(classify("5 years", &[], &["of", "age"]), Category::Age);
    }

    #[test]
    fn test_age_by_preceding() {
        assert_eq!(classify("1980", &["was", "born", "in"], &[]), Category::Age);
        assert_eq!(classify("50", &["the", "age", "of"], &[]), Category::Age);
    }

    #[test]
    fn test_age_by_surface() {
        assert_eq!(classify("77-year-old", &["a"], &["male"]), Category::Age);
        assert_eq!(classify("77 years old", &["a"], &["woman"]), Category::Age);
    }

    #[test]
    fn test_weekday_is_relative() {
        assert_eq!(classify("Monday", &["on"], &[]), Category::Rel);
        assert_eq!(classify("next tuesday", &[], &[]), Category::Rel);
    }

    #[test]
    fn test_hospital_day_is_relative() {
        assert_eq!(classify("HD#3", &["on"], &[]), Category::Rel);
        assert_eq!(classify("POD 12", &["on"], &[]), Category::Rel);
        assert_eq!(classify("hospital stay", &["during"], &[]), Category::Rel);
    }

    #[test]
    fn test_duration_signals() {
        assert_eq!(classify("3 weeks", &["persisted", "for"], &[]), Category::Dur);
        assert_eq!(classify("3 days", &["given", "x"], &[]), Category::Dur);
        assert_eq!(classify("week", &["over", "the", "last"], &[]), Category::Dur);
        assert_eq!(classify("2 hours", &["lasting"], &[]), Category::Dur);
    }

    #[test]
    fn test_frequency_signals() {
        assert_eq!(classify("week", &["taken", "every"], &[]), Category::Frq);
        assert_eq!(classify("day", &["mg", "per"], &[]), Category::Frq);
        assert_eq!(classify("twice a day", &["dosed"], &[]), Category::Frq);
        assert_eq!(classify("weekly", &[], &[]), Category::Frq);
    }

    #[test]
    fn test_relative_forms() {
        assert_eq!(classify("3 weeks ago", &[], &[]), Category::Rel);
        assert_eq!(classify("2 days later", &[], &[]), Category::Rel);
        assert_eq!(classify("next week", &["the"], &[]), Category::Rel);
        assert_eq!(classify("same day", &["the"], &[]), Category::Rel);
        assert_eq!(classify("the next morning", &[], &[]), Category::Rel);
        assert_eq!(classify("first day", &["the"], &[]), Category::Rel);
        assert_eq!(classify("day 1", &["on"], &[]), Category::Rel);
        assert_eq!(classify("day two", &["on"], &[]), Category::Rel);
        assert_eq!(classify("now", &["until"], &[]), Category::Rel);
    }

    #[test]
    fn test_other_for_unanchored_units() {
        assert_eq!(classify("3 week", &["a"], &["treatment"]), Category::Other);
        assert_eq!(classify("2 months", &["the"], &["supply"]), Category::Other);
    }

    #[test]
    fn test_date_default() {
        assert_eq!(classify("March 3", &["on"], &[]), Category::Date);
        assert_eq!(classify("13NOV2011", &[], &[]), Category::Date);
        assert_eq!(classify("September", &["in"], &[]), Category::Date);
        assert_eq!(classify("2017", &["during"], &[]), Category::Date);
    }

    #[test]
    fn test_rule_order_duration_beats_relative() {
        // "for 3 days ago" is nonsense, but the table is ordered: the
        // duration signal one back wins over the trailing boundary word.
        assert_eq!(classify("3 days ago", &["for"], &[]), Category::Dur);
    }
}
