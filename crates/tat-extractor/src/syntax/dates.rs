//! Date phrase detection and resolution

use chrono::{Datelike, Days, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;

/// Structured parse of one date phrase
///
/// `start`/`end` are ISO-8601 dates; `None` when the phrase cannot be pinned to
/// the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParse {
    pub text: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateParse {
    fn new(text: &str, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        Self {
            text: text.to_string(),
            start: range.map(|(start, _)| start.to_string()),
            end: range.map(|(_, end)| end.to_string()),
        }
    }
}

/// Shapes of date phrase the parser recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    Iso,
    MonthDayYear,
    DayMonthYear,
    MonthYear,
    MonthDay,
    Weekday,
    Relative,
    Month,
}

/// Evaluated in order; earlier rules claim overlapping text
const DATE_PATTERNS: &[(&str, DateKind)] = &[
    (r"\b\d{4}-\d{2}-\d{2}\b", DateKind::Iso),
    (
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.? \d{1,2}(?:st|nd|rd|th)?,? \d{4}\b",
        DateKind::MonthDayYear,
    ),
    (
        r"\b\d{1,2}(?:st|nd|rd|th)? (?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?,? \d{4}\b",
        DateKind::DayMonthYear,
    ),
    (
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?,? \d{4}\b",
        DateKind::MonthYear,
    ),
    (
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.? \d{1,2}(?:st|nd|rd|th)?\b",
        DateKind::MonthDay,
    ),
    (
        r"\b(?:(?:[Nn]ext|[Ll]ast|[Tt]his) )?(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\b",
        DateKind::Weekday,
    ),
    (
        r"(?i)\b(?:today|tonight|tomorrow|yesterday|(?:next|last|this|past|coming) (?:week|weekend|month|quarter|year|decade))\b",
        DateKind::Relative,
    ),
    (
        r"\b(?:January|February|March|April|June|July|August|September|October|November|December)\b",
        DateKind::Month,
    ),
];

static DATE_RULES: Lazy<RuleSet<DateKind>> = Lazy::new(|| RuleSet::from_table(DATE_PATTERNS));

/// Non-overlapping date phrases as `(start, end, kind)`, in text order
pub fn find_dates(text: &str) -> Vec<(usize, usize, DateKind)> {
    let mut found: Vec<(usize, usize, DateKind)> = Vec::new();
    for (kind, m) in DATE_RULES.all_matches(text) {
        if found.iter().any(|&(start, end, _)| m.start() < end && start < m.end()) {
            continue;
        }
        found.push((m.start(), m.end(), kind));
    }
    found.sort_by_key(|&(start, _, _)| start);
    found
}

/// Resolve a phrase to calendar bounds.
///
/// Relative phrases and partial dates need a reference date; without one they
/// stay unresolved.
pub fn parse_date(text: &str, kind: DateKind, reference: Option<NaiveDate>) -> DateParse {
    DateParse::new(text, resolve(text, kind, reference))
}

fn resolve(text: &str, kind: DateKind, reference: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    let words = words(text);
    match kind {
        DateKind::Iso => {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
            Some((date, date))
        }
        DateKind::MonthDayYear | DateKind::DayMonthYear => {
            let month = words.iter().find_map(|w| month_number(w))?;
            let year = words
                .iter()
                .filter(|w| w.len() == 4)
                .find_map(|w| w.parse().ok())?;
            let day = words
                .iter()
                .find(|w| w.len() <= 2 && w.chars().all(|c| c.is_ascii_digit()))
                .and_then(|w| w.parse().ok())?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some((date, date))
        }
        DateKind::MonthYear => {
            let month = words.iter().find_map(|w| month_number(w))?;
            let year = words.iter().find_map(|w| w.parse().ok())?;
            month_range(year, month)
        }
        DateKind::MonthDay => {
            let reference = reference?;
            let month = words.iter().find_map(|w| month_number(w))?;
            let day = words.iter().find_map(|w| w.parse().ok())?;
            let date = NaiveDate::from_ymd_opt(reference.year(), month, day)?;
            Some((date, date))
        }
        DateKind::Month => {
            let reference = reference?;
            let month = words.iter().find_map(|w| month_number(w))?;
            month_range(reference.year(), month)
        }
        DateKind::Weekday => {
            let reference = reference?;
            let weekday = words.iter().find_map(|w| w.parse::<Weekday>().ok())?;
            let ahead = (7 + weekday.num_days_from_monday() as i64
                - reference.weekday().num_days_from_monday() as i64)
                % 7;
            let upcoming = reference.checked_add_days(Days::new(ahead as u64))?;
            let date = match words.first().map(|w| w.to_lowercase()).as_deref() {
                Some("next") => upcoming.checked_add_days(Days::new(7))?,
                Some("last") => upcoming.checked_sub_days(Days::new(7))?,
                _ => upcoming,
            };
            Some((date, date))
        }
        DateKind::Relative => resolve_relative(&text.to_lowercase(), reference?),
    }
}

fn resolve_relative(phrase: &str, reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let single = |date: NaiveDate| Some((date, date));
    match phrase {
        "today" | "tonight" => return single(reference),
        "tomorrow" => return single(reference.succ_opt()?),
        "yesterday" => return single(reference.pred_opt()?),
        _ => {}
    }

    let (modifier, unit) = phrase.split_once(' ')?;
    let offset: i32 = match modifier {
        "next" | "coming" => 1,
        "last" | "past" => -1,
        _ => 0,
    };

    match unit {
        "week" | "weekend" => {
            let monday = reference.checked_sub_days(Days::new(reference.weekday().num_days_from_monday() as u64))?;
            let monday = shift_days(monday, 7 * offset as i64)?;
            if unit == "weekend" {
                Some((monday.checked_add_days(Days::new(5))?, monday.checked_add_days(Days::new(6))?))
            } else {
                Some((monday, monday.checked_add_days(Days::new(6))?))
            }
        }
        "month" => {
            let index = reference.year() * 12 + reference.month0() as i32 + offset;
            month_range(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        }
        "quarter" => {
            let index = reference.year() * 4 + (reference.month0() / 3) as i32 + offset;
            let (year, quarter) = (index.div_euclid(4), index.rem_euclid(4) as u32);
            let start = NaiveDate::from_ymd_opt(year, quarter * 3 + 1, 1)?;
            let (_, end) = month_range(year, quarter * 3 + 3)?;
            Some((start, end))
        }
        "year" => {
            let year = reference.year() + offset;
            Some((NaiveDate::from_ymd_opt(year, 1, 1)?, NaiveDate::from_ymd_opt(year, 12, 31)?))
        }
        "decade" => {
            let decade = (reference.year().div_euclid(10) + offset) * 10;
            Some((NaiveDate::from_ymd_opt(decade, 1, 1)?, NaiveDate::from_ymd_opt(decade + 9, 12, 31)?))
        }
        _ => None,
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

fn month_number(word: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
    let lower = word.to_lowercase();
    if lower.len() < 3 || !lower.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| lower.starts_with(m))
        .map(|i| i as u32 + 1)
}

/// Words of a phrase with ordinal suffixes and punctuation stripped
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '.')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let digits = w.trim_end_matches(|c: char| c.is_ascii_alphabetic());
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                digits.to_string()
            } else {
                w.to_string()
            }
        })
        .collect()
}
