//! Absolute-date resolution for DATE-classified spans.
//!
//! Tries an ordered chain of parsing strategies until one succeeds:
//! a compound-day split ("2 and 5 Dec 2019"), a general calendar parse that
//! never substitutes today's date for missing components, and a
//! complementary format cascade for forms the general parser cannot handle
//! (`DDMonYYYY`, `DDMon`, and four range shapes). Range matches split one
//! span into two dated results around the separator.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::types::{DateResolution, PartialDate};

// ============================================================================
// Policy
// ============================================================================

/// Policy constants for date resolution.
///
/// These are configuration, not derived values: the two-digit-year
/// threshold, the year assumed when no reference date is supplied, and the
/// per-month day-count table (February carries a fixed 29-day allowance;
/// no variable leap-year logic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverPolicy {
    /// Two-digit years above this value map to 19xx, the rest to 20xx.
    pub century_threshold: u32,
    /// Year assumed for `DDMon` forms when no reference year is available.
    pub fallback_year: i32,
    /// Maximum day number per month; day values are clamped against it.
    pub month_days: [u32; 12],
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            century_threshold: 30,
            fallback_year: 1900,
            month_days: [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
        }
    }
}

impl ResolverPolicy {
    /// Expand a two-digit year through the century threshold.
    fn expand_year(&self, two_digit: u32) -> i32 {
        if two_digit > self.century_threshold {
            1900 + two_digit as i32
        } else {
            2000 + two_digit as i32
        }
    }

    /// Interpret a parsed year field, expanding two-digit values.
    fn interpret_year(&self, raw: u32) -> i32 {
        if raw < 100 {
            self.expand_year(raw)
        } else {
            raw as i32
        }
    }

    /// Build a date, clamping the day against the month table. February 29
    /// on a non-leap year falls back to the 28th.
    pub fn build_date(&self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let clamped = day.clamp(1, self.month_days[(month - 1) as usize]);
        NaiveDate::from_ymd_opt(year, month, clamped)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// One dated half of a resolved span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPart {
    pub date: NaiveDate,
    pub confidence: f32,
}

/// Result of a successful resolution strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverOutcome {
    /// The span resolves to one date (or a partial triple pending context).
    Single {
        resolution: DateResolution,
        confidence: f32,
    },
    /// The span covers two dates and must be split at the separator.
    /// `separator` is the byte range of the separator within the surface.
    Split {
        first: ResolvedPart,
        second: ResolvedPart,
        separator: (usize, usize),
    },
}

// ============================================================================
// Strategy Chain
// ============================================================================

/// Resolve a DATE-classified surface string.
///
/// Strategies are tried in order; `None` means every strategy failed and
/// the span should be dropped.
pub fn resolve(
    surface: &str,
    reference_year: Option<i32>,
    policy: &ResolverPolicy,
) -> Option<ResolverOutcome> {
    if let Some(outcome) = compound_day_split(surface, reference_year, policy) {
        return Some(outcome);
    }
    if let Some((resolution, confidence)) = general_parse(surface, policy) {
        return Some(ResolverOutcome::Single {
            resolution,
            confidence,
        });
    }
    complementary(surface, reference_year, policy)
}

// ----------------------------------------------------------------------------
// Strategy 1: compound-day split
// ----------------------------------------------------------------------------

static COMPOUND_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})\s(and)\s(\d{1,2}\s[a-z]+\.?,?\s?\d{4})$").expect("Invalid regex")
});

/// Detect "D1 and D2 Month[,] Year" and resolve each day against the shared
/// month and year by recursing into the strategy chain.
fn compound_day_split(
    surface: &str,
    reference_year: Option<i32>,
    policy: &ResolverPolicy,
) -> Option<ResolverOutcome> {
    let caps = COMPOUND_DAY.captures(surface)?;
    let day1 = caps.get(1)?;
    let rest = caps.get(3)?;

    // "5 Dec 2019" resolves directly; "2 Dec 2019" is rebuilt from the
    // shared month/year.
    let second = resolve(rest.as_str(), reference_year, policy)?;
    let tail = rest.as_str().splitn(2, ' ').nth(1)?;
    let first = resolve(&format!("{} {}", day1.as_str(), tail), reference_year, policy)?;

    match (first, second) {
        (
            ResolverOutcome::Single {
                resolution: DateResolution::Resolved { date: d1 },
                confidence: c1,
            },
            ResolverOutcome::Single {
                resolution: DateResolution::Resolved { date: d2 },
                confidence: c2,
            },
        ) => {
            let sep = caps.get(2)?;
            Some(ResolverOutcome::Split {
                first: ResolvedPart {
                    date: d1,
                    confidence: c1,
                },
                second: ResolvedPart {
                    date: d2,
                    confidence: c2,
                },
                separator: (sep.start(), sep.end()),
            })
        }
        _ => None,
    }
}

// ----------------------------------------------------------------------------
// Strategy 2: general parse
// ----------------------------------------------------------------------------

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)(?:st|nd|rd|th)").expect("Invalid regex"));
static BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:19|20)\d{2}$").expect("Invalid regex"));

const MONTH_NAME: &str = "(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)";

static WRITTEN_MDY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{MONTH_NAME}\s(\d{{1,2}})(?:\s(\d{{2,4}}))?$")).expect("Invalid regex")
});
static WRITTEN_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(\d{{1,2}})\s{MONTH_NAME}(?:\s(\d{{2,4}}))?$")).expect("Invalid regex")
});
static WRITTEN_MY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{MONTH_NAME}\s(\d{{4}})$")).expect("Invalid regex")
});
static WRITTEN_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{MONTH_NAME}$")).expect("Invalid regex"));
static NUMERIC_MDY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})$").expect("Invalid regex"));
static NUMERIC_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("Invalid regex"));
static NUMERIC_MD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})$").expect("Invalid regex"));

/// Attempt a full calendar parse without substituting today's date for
/// missing components: a string yielding only month/day produces a partial
/// triple with the year absent, never a guessed year. Compact `DDMonYYYY`
/// forms are deliberately absent; the complementary cascade owns those.
fn general_parse(surface: &str, policy: &ResolverPolicy) -> Option<(DateResolution, f32)> {
    let normalized = normalize(surface);

    let triple = parse_triple(&normalized, policy)?;

    // No-parse conditions: everything absent, or fields out of range.
    if triple.is_empty() {
        return None;
    }
    if let Some(m) = triple.month {
        if !(1..=12).contains(&m) {
            return None;
        }
    }
    if let Some(d) = triple.day {
        if !(1..=31).contains(&d) {
            return None;
        }
    }

    let resolution = match (triple.year, triple.month, triple.day) {
        (Some(y), Some(m), Some(d)) => DateResolution::Resolved {
            date: policy.build_date(y, m, d)?,
        },
        _ => DateResolution::Partial { partial: triple },
    };
    Some((resolution, 1.0))
}

/// Extract a raw year/month/day triple from a normalized string, most
/// specific form first.
fn parse_triple(s: &str, policy: &ResolverPolicy) -> Option<PartialDate> {
    if let Some(caps) = WRITTEN_MDY.captures(s) {
        return Some(PartialDate {
            year: caps
                .get(3)
                .and_then(|y| y.as_str().parse::<u32>().ok())
                .map(|y| policy.interpret_year(y)),
            month: month_number(&caps[1]),
            day: caps[2].parse().ok(),
        });
    }
    if let Some(caps) = WRITTEN_DMY.captures(s) {
        return Some(PartialDate {
            year: caps
                .get(3)
                .and_then(|y| y.as_str().parse::<u32>().ok())
                .map(|y| policy.interpret_year(y)),
            month: month_number(&caps[2]),
            day: caps[1].parse().ok(),
        });
    }
    if let Some(caps) = WRITTEN_MY.captures(s) {
        return Some(PartialDate {
            year: caps[2].parse().ok(),
            month: month_number(&caps[1]),
            day: None,
        });
    }
    if let Some(caps) = WRITTEN_MONTH.captures(s) {
        return Some(PartialDate {
            year: None,
            month: month_number(&caps[1]),
            day: None,
        });
    }
    if let Some(caps) = NUMERIC_ISO.captures(s) {
        return Some(PartialDate {
            year: caps[1].parse().ok(),
            month: caps[2].parse().ok(),
            day: caps[3].parse().ok(),
        });
    }
    if let Some(caps) = NUMERIC_MDY.captures(s) {
        return Some(PartialDate {
            year: caps[3]
                .parse::<u32>()
                .ok()
                .map(|y| policy.interpret_year(y)),
            month: caps[1].parse().ok(),
            day: caps[2].parse().ok(),
        });
    }
    if let Some(caps) = NUMERIC_MD.captures(s) {
        return Some(PartialDate {
            year: None,
            month: caps[1].parse().ok(),
            day: caps[2].parse().ok(),
        });
    }
    if BARE_YEAR.is_match(s) {
        return Some(PartialDate {
            year: s.parse().ok(),
            month: None,
            day: None,
        });
    }
    None
}

/// Normalize a surface string for the general parser: lowercase, ordinal
/// suffixes stripped, commas/periods and "of" dropped, whitespace collapsed.
fn normalize(surface: &str) -> String {
    let lowered = surface.to_lowercase();
    let stripped = ORDINAL_SUFFIX.replace_all(&lowered, "$1");
    stripped
        .replace([',', '.'], " ")
        .split_whitespace()
        .filter(|w| *w != "of" && *w != "the")
        .collect::<Vec<_>>()
        .join(" ")
}

// ----------------------------------------------------------------------------
// Strategy 3: complementary format cascade
// ----------------------------------------------------------------------------

const MON3: &str = "(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)";

static DDMON_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(\d{{1,2}}){MON3}(\d{{2}}|\d{{4}})(\s?-\s?)(\d{{1,2}}){MON3}(\d{{2}}|\d{{4}})$"
    ))
    .expect("Invalid regex")
});
static DDMON_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(\d{{1,2}}){MON3}\.?(\d{{2}}|\d{{4}})$")).expect("Invalid regex")
});
static DDMON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(\d{{1,2}}){MON3}$")).expect("Invalid regex")
});
static SLASH_FULL_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2,4})(\s?-\s?)(\d{1,2})/(\d{1,2})/(\d{2,4})$")
        .expect("Invalid regex")
});
static SLASH_SHARED_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})(\s?-\s?)(\d{1,2})/(\d{1,2})/(\d{2,4})$")
        .expect("Invalid regex")
});
static SLASH_SHARED_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})(\s?-\s?)(\d{1,2})/(\d{2,4})$").expect("Invalid regex")
});
static DAY_RANGE_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(\s?-\s?|\sto\s)(\d{1,2})\s([a-z]+)\.?,?\s?(\d{4})$")
        .expect("Invalid regex")
});

/// Month number from a written month name or abbreviation.
fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [(&str, u32); 12] = [
        ("january", 1),
        ("february", 2),
        ("march", 3),
        ("april", 4),
        ("may", 5),
        ("june", 6),
        ("july", 7),
        ("august", 8),
        ("september", 9),
        ("october", 10),
        ("november", 11),
        ("december", 12),
    ];
    let lower = name.trim_end_matches('.').to_lowercase();
    MONTHS
        .iter()
        .find(|(full, _)| *full == lower || full.starts_with(&lower) && lower.len() >= 3)
        .map(|(_, number)| *number)
}

/// Explicit handling for formats the general parser cannot, in order:
/// `DDMonYYYY`/`DDMonYY`, `DDMon`, then the range forms.
fn complementary(
    surface: &str,
    reference_year: Option<i32>,
    policy: &ResolverPolicy,
) -> Option<ResolverOutcome> {
    let trimmed = surface.trim();

    // 28JUL05-12AUG06 — checked before the single compact form so the
    // left half is not consumed alone.
    if let Some(caps) = DDMON_RANGE.captures(trimmed) {
        let first = ddmon_part(&caps, 1, policy)?;
        let second = ddmon_part(&caps, 5, policy)?;
        let sep = caps.get(4)?;
        return Some(ResolverOutcome::Split {
            first,
            second,
            separator: (sep.start(), sep.end()),
        });
    }

    // 13NOV2011, 3Apr11
    if let Some(caps) = DDMON_YEAR.captures(trimmed) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = policy.interpret_year(caps[3].parse().ok()?);
        let date = policy.build_date(year, month, day)?;
        return Some(ResolverOutcome::Single {
            resolution: DateResolution::Resolved { date },
            confidence: 1.0,
        });
    }

    // 13NOV — year defaulted from the reference, else the policy fallback.
    if let Some(caps) = DDMON.captures(trimmed) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = reference_year.unwrap_or(policy.fallback_year);
        let date = policy.build_date(year, month, day)?;
        return Some(ResolverOutcome::Single {
            resolution: DateResolution::Resolved { date },
            confidence: 0.8,
        });
    }

    // 7/28/2005-8/12/2006
    if let Some(caps) = SLASH_FULL_RANGE.captures(trimmed) {
        let first = slash_part(&caps[1], &caps[2], &caps[3], policy)?;
        let second = slash_part(&caps[5], &caps[6], &caps[7], policy)?;
        let sep = caps.get(4)?;
        return Some(ResolverOutcome::Split {
            first,
            second,
            separator: (sep.start(), sep.end()),
        });
    }

    // 7/28-8/12/2006 — the left half borrows the right half's year.
    if let Some(caps) = SLASH_SHARED_YEAR.captures(trimmed) {
        let first = slash_part(&caps[1], &caps[2], &caps[6], policy)?;
        let second = slash_part(&caps[4], &caps[5], &caps[6], policy)?;
        let sep = caps.get(3)?;
        return Some(ResolverOutcome::Split {
            first,
            second,
            separator: (sep.start(), sep.end()),
        });
    }

    // 7/28-30/2005 — shared month and year.
    if let Some(caps) = SLASH_SHARED_MONTH.captures(trimmed) {
        let first = slash_part(&caps[1], &caps[2], &caps[5], policy)?;
        let second = slash_part(&caps[1], &caps[4], &caps[5], policy)?;
        let sep = caps.get(3)?;
        return Some(ResolverOutcome::Split {
            first,
            second,
            separator: (sep.start(), sep.end()),
        });
    }

    // "3-5 March 2020", "3 to 5 March 2020" — shared month and year.
    if let Some(caps) = DAY_RANGE_MONTH.captures(trimmed) {
        let month = month_number(&caps[4])?;
        let year: i32 = caps[5].parse().ok()?;
        let first = ResolvedPart {
            date: policy.build_date(year, month, caps[1].parse().ok()?)?,
            confidence: 1.0,
        };
        let second = ResolvedPart {
            date: policy.build_date(year, month, caps[3].parse().ok()?)?,
            confidence: 1.0,
        };
        let sep = caps.get(2)?;
        return Some(ResolverOutcome::Split {
            first,
            second,
            separator: (sep.start(), sep.end()),
        });
    }

    None
}

/// Resolve one `DDMonYY(YY)` half of a compact range from capture groups
/// starting at `base`.
fn ddmon_part(
    caps: &regex::Captures<'_>,
    base: usize,
    policy: &ResolverPolicy,
) -> Option<ResolvedPart> {
    let day: u32 = caps[base].parse().ok()?;
    let month = month_number(&caps[base + 1])?;
    let year = policy.interpret_year(caps[base + 2].parse().ok()?);
    Some(ResolvedPart {
        date: policy.build_date(year, month, day)?,
        confidence: 1.0,
    })
}

/// Resolve one `mon/day/year` triple of a slash range.
fn slash_part(
    month: &str,
    day: &str,
    year: &str,
    policy: &ResolverPolicy,
) -> Option<ResolvedPart> {
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let year = policy.interpret_year(year.parse().ok()?);
    Some(ResolvedPart {
        date: policy.build_date(year, month, day)?,
        confidence: 1.0,
    })
}
