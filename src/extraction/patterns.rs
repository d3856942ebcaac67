//! Pattern library for temporal expression candidates.
//!
//! A fixed, ordered set of anchored, case-insensitive patterns covering
//! calendar dates, relative expressions, durations, frequencies, ages, and
//! clinical temporal idioms. Patterns are matched against reconstructed
//! token windows, never against substrings: a window is a candidate only if
//! some pattern matches it entirely.
//!
//! The library is compiled once per annotator and reused for every window
//! of every sentence.

use regex::Regex;

// ============================================================================
// Pattern Fragments
// ============================================================================

/// Month names and abbreviations.
const MONTH: &str = "(?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)";

/// Three-letter month abbreviations for compact forms like `13NOV2011`.
const MON3: &str = "(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)";

/// Weekday names and abbreviations.
const WEEKDAY: &str = "(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|weds|wed|thurs|thur|thu|fri|sat|sun)";

/// Calendar interval nouns with plurals and abbreviations.
const UNIT: &str =
    "(?:minutes?|mins?|hours?|hrs?|days?|weeks?|wks?|months?|mos?|years?|yrs?|quarters?)";

/// Day-part nouns used in relative idioms.
const DAYPART: &str = "(?:day|morning|afternoon|evening|night|time)";

/// Spelled-out magnitudes, including indefinite quantity words.
const SPELLED: &str = "(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|(?:twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)(?:-(?:one|two|three|four|five|six|seven|eight|nine))?|an|a|couple|few|several)";

/// Numeric or spelled-out quantity.
const QTY: &str = "(?:\\d+(?:\\.\\d+)?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|(?:twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)(?:-(?:one|two|three|four|five|six|seven|eight|nine))?|an|a|couple|few|several)";

/// Vagueness qualifiers that may prefix a relative quantity.
const VAGUE: &str = "(?:around|about|roughly|nearly|over|approx\\.?|approximately|approximate)";

/// Ordinal words and numeric ordinals.
const ORDINAL: &str =
    "(?:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|\\d+(?:st|nd|rd|th))";

/// Relative boundary words.
const REL_TAIL: &str = "(?:ago|later|earlier|after|before|prior|post)";

// ============================================================================
// Pattern Library
// ============================================================================

/// The ordered, compiled pattern set.
pub struct PatternLibrary {
    patterns: Vec<Regex>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary {
    /// Compile the full pattern set. Compilation happens once; the library
    /// is then shared across all documents and sentences.
    pub fn new() -> Self {
        let patterns = raw_patterns()
            .into_iter()
            .map(|p| Regex::new(&format!("^(?i){}$", p)).expect("Invalid pattern"))
            .collect();
        Self { patterns }
    }

    /// Whether any pattern matches the entire window string.
    pub fn is_match(&self, window: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(window))
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when the library holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// The raw pattern set, in match-priority order: dates, weekdays, relative
/// idioms, durations, frequencies, ages, clinical idioms.
fn raw_patterns() -> Vec<String> {
    vec![
        // --- Calendar dates, written forms -------------------------------
        // "march 30, 2017", "Feb. 12, 2011"
        format!(r"{MONTH}\.?\s\d{{1,2}}(?:st|nd|rd|th)?,?\s\d{{2,4}}"),
        // "March 3", "Oct. 12th"
        format!(r"{MONTH}\.?\s\d{{1,2}}(?:st|nd|rd|th)?"),
        // "September 2020"
        format!(r"{MONTH}\.?,?\s\d{{4}}"),
        // Bare month mention
        MONTH.to_string(),
        // "13 Nov 2011", "3rd of May", "21 December"
        format!(r"\d{{1,2}}(?:st|nd|rd|th)?\s(?:of\s)?{MONTH}\.?(?:,?\s\d{{2,4}})?"),
        // "2 and 5 Dec 2019"
        format!(r"\d{{1,2}}\sand\s\d{{1,2}}\s{MONTH}\.?(?:,?\s?\d{{4}})?"),
        // "3-5 March 2020", "3 to 5 March 2020"
        format!(r"\d{{1,2}}(?:\s?-\s?|\sto\s)\d{{1,2}}\s{MONTH}\.?,?\s?\d{{4}}"),
        // --- Calendar dates, compact forms -------------------------------
        // "28JUL05-12AUG06"
        format!(r"\d{{1,2}}{MON3}\d{{2,4}}\s?-\s?\d{{1,2}}{MON3}\d{{2,4}}"),
        // "13NOV2011", "3Apr11"
        format!(r"\d{{1,2}}{MON3}\.?\d{{2,4}}"),
        // "13NOV"
        format!(r"\d{{1,2}}{MON3}"),
        // --- Calendar dates, numeric forms -------------------------------
        // "7/28/2005-8/12/2006"
        r"\d{1,2}/\d{1,2}/\d{2,4}\s?-\s?\d{1,2}/\d{1,2}/\d{2,4}".to_string(),
        // "7/28-8/12/2006"
        r"\d{1,2}/\d{1,2}\s?-\s?\d{1,2}/\d{1,2}/\d{2,4}".to_string(),
        // "7/28-30/2005"
        r"\d{1,2}/\d{1,2}\s?-\s?\d{1,2}/\d{2,4}".to_string(),
        // "3/30/2017", "3-30-17"
        r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}".to_string(),
        // ISO "2017-03-30"
        r"\d{4}-\d{1,2}-\d{1,2}".to_string(),
        // "7/28"
        r"\d{1,2}/\d{1,2}".to_string(),
        // Bare year, 19xx/20xx only
        r"(?:19|20)\d{2}".to_string(),
        // --- Weekdays and deictic day names ------------------------------
        WEEKDAY.to_string(),
        format!(r"(?:next|last|this|following|previous)\s{WEEKDAY}"),
        r"(?:yesterday|today|tomorrow|tonight|now)".to_string(),
        // --- Relative idioms ---------------------------------------------
        // "the next morning", "same day", "last week", "the following year"
        format!(r"(?:the\s)?(?:next|last|same|following|previous|prior)\s(?:{UNIT}|{DAYPART})"),
        // "3 days ago", "two weeks later", "several days prior"
        format!(r"{QTY}\s{UNIT}\s{REL_TAIL}"),
        // "about 3 days ago", "approximately one week later"
        format!(r"{VAGUE}\s{QTY}\s{UNIT}(?:\s{REL_TAIL})?"),
        // "day of vaccination", "the day of surgery"
        r"(?:the\s)?day\sof\s(?:vaccination|immunization|surgery|admission|discharge|onset|injection)"
            .to_string(),
        // --- Durations ---------------------------------------------------
        // "3 weeks", "a year", "several days"
        format!(r"{QTY}\s{UNIT}"),
        // Bare unit; context decides the category
        UNIT.to_string(),
        // "a year and a half", "2 months and a quarter"
        format!(r"{QTY}\s{UNIT}\sand\sa\s(?:half|quarter)"),
        // "three and a half weeks"
        format!(r"{QTY}\sand\sa\s(?:half|quarter)\s{UNIT}"),
        // "half a week", "half an hour"
        format!(r"(?:a\s)?half\s(?:an?\s)?{UNIT}"),
        // "3/4 weeks"
        format!(r"\d+/\d+\s{UNIT}"),
        // "3-5 days", "3 to 5 days"
        format!(r"\d+(?:\s?-\s?|\sto\s)\d+\s{UNIT}"),
        // --- Frequencies -------------------------------------------------
        r"(?:daily|weekly|monthly|yearly|annually|hourly|nightly|bi-?weekly|bi-?monthly)"
            .to_string(),
        // "twice a day", "3 times per week"
        format!(r"(?:once|twice|{QTY}\stimes)\s(?:a|an|per|each)\s{UNIT}"),
        // --- Ages --------------------------------------------------------
        // "77 years old", "77-year-old", "6 month old"
        format!(r"{QTY}[\s-]?(?:years?|months?|weeks?|days?)[\s-]?old"),
        // "77 yo", "77 y/o"
        format!(r"{QTY}\s?(?:yo|y/o|y\.o\.)"),
        // --- Clinical idioms ---------------------------------------------
        // "HD#3", "POD 12"
        r"(?:hd|pod)\s?#?\s?\d+".to_string(),
        // "hospital day 3", "post-op day 2", "postoperative day 12"
        r"(?:hospital|post-?op(?:erative)?)\sday\s?#?\s?\d+".to_string(),
        // "hospital stay", "ICU stay"
        r"(?:hospital|icu)\sstay".to_string(),
        // "day 1", "day two"
        r"day\s?#?\s?(?:\d+|one|two|three|four|five|six|seven|eight|nine)".to_string(),
        // "first day", "second week", "5th day"
        format!(r"{ORDINAL}\s(?:{UNIT}|{DAYPART})"),
        // "beginning of the month", "end of year"
        r"(?:beginning|middle|end|start)\sof\s(?:the\s)?(?:month|year|week)".to_string(),
    ]
}
