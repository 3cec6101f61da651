//! Lenient premiere date parsing.
//!
//! Premiere dates arrive as free text in whatever shape the catalogue author
//! typed them: `"August 5, 2019"`, `"Sept. 25th, 2020"`, `"2021-03-05"`,
//! `"05/03/2021"`. Parsing never fails loudly; text that matches none of the
//! accepted shapes yields `None` and the film simply has no year.
//!
//! Accepted shapes, tried in order:
//!
//! | Shape                 | Example                  | Notes                          |
//! |-----------------------|--------------------------|--------------------------------|
//! | ISO date / datetime   | `2021-03-05`, `2021-03-05T10:00:00` | time part ignored   |
//! | slash/dash/dot digits | `03/05/2021`, `3/5/21`, `25.03.2021` | month first, day first if month > 12 |
//! | month and year        | `March 2021`             | first day of the month         |
//! | bare year             | `2021`                   | January 1st, 1800 to 2999 only |
//! | month name            | `March 5, 2021`, `5-Mar-21`, `Friday, March 5th 2021` | |
//!
//! Two-digit years follow chrono's `%y` pivot: `00`-`69` is 20xx, `70`-`99` is 19xx.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// `2021-03-05`, `2021/3/5`, optionally followed by a time.
static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}([-/.])\d{1,2}[-/.]\d{1,2}").expect("valid year-first pattern"));

/// `03/05/2021`, `3-5-21`, `25.03.2021`.
static YEAR_LAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}([-/.])\d{1,2}[-/.](\d{2}|\d{4})$").expect("valid year-last pattern")
});

/// Month-name layouts, gated so the year field has exactly the digits its
/// format expects.
static TEXT_LAYOUTS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"^[A-Z][a-z]{2} \d{1,2} \d{4}$", "%b %d %Y"),
        (r"^\d{1,2} [A-Z][a-z]{2} \d{4}$", "%d %b %Y"),
        (r"^\d{4} [A-Z][a-z]{2} \d{1,2}$", "%Y %b %d"),
        (r"^[A-Z][a-z]{2} \d{1,2} \d{2}$", "%b %d %y"),
        (r"^\d{1,2} [A-Z][a-z]{2} \d{2}$", "%d %b %y"),
    ]
    .into_iter()
    .map(|(pattern, fmt)| (Regex::new(pattern).expect("valid text layout"), fmt))
    .collect()
});

static MONTHS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\bjan(uary)?\b", "Jan"),
        (r"(?i)\bfeb(ruary)?\b", "Feb"),
        (r"(?i)\bmar(ch)?\b", "Mar"),
        (r"(?i)\bapr(il)?\b", "Apr"),
        (r"(?i)\bmay\b", "May"),
        (r"(?i)\bjune?\b", "Jun"),
        (r"(?i)\bjuly?\b", "Jul"),
        (r"(?i)\baug(ust)?\b", "Aug"),
        (r"(?i)\bsep(t(ember)?)?\b", "Sep"),
        (r"(?i)\boct(ober)?\b", "Oct"),
        (r"(?i)\bnov(ember)?\b", "Nov"),
        (r"(?i)\bdec(ember)?\b", "Dec"),
    ]
    .into_iter()
    .map(|(pattern, short)| (Regex::new(pattern).expect("valid month pattern"), short))
    .collect()
});

static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(mon|tue|wed|thu|fri|sat|sun)[a-z]*\b")
        .expect("valid weekday pattern")
});

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal pattern"));

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,.]").expect("valid punctuation pattern"));

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][a-z]{2}) (\d{4})$").expect("valid month-year pattern")
});

static BARE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(1[89]|2\d)\d{2}$").expect("valid year pattern"));

/// Parse free-text premiere into a calendar date.
///
/// Deterministic: the same text always yields the same result.
pub fn parse_premiere(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = parse_numeric(trimmed) {
        return Some(date);
    }

    let canonical = canonicalize(trimmed);

    if let Some(caps) = MONTH_YEAR.captures(&canonical) {
        let first_of_month = format!("1 {} {}", &caps[1], &caps[2]);
        return NaiveDate::parse_from_str(&first_of_month, "%d %b %Y").ok();
    }

    if BARE_YEAR.is_match(&canonical) {
        return canonical
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    TEXT_LAYOUTS
        .iter()
        .filter(|(re, _)| re.is_match(&canonical))
        .find_map(|(_, fmt)| NaiveDate::parse_from_str(&canonical, fmt).ok())
}

/// Calendar year of the premiere, if parseable.
pub fn premiere_year(text: &str) -> Option<i32> {
    parse_premiere(text).map(|d| d.year())
}

fn parse_numeric(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = YEAR_FIRST.captures(text) {
        let sep = &caps[1];
        if let Ok(date) = NaiveDate::parse_from_str(text, &format!("%Y{sep}%m{sep}%d")) {
            return Some(date);
        }
        return DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|dt| dt.date());
    }

    let caps = YEAR_LAST.captures(text)?;
    let sep = &caps[1];
    let year = if caps[2].len() == 4 { "%Y" } else { "%y" };

    // Month first; day first only when that reading is impossible
    [format!("%m{sep}%d{sep}{year}"), format!("%d{sep}%m{sep}{year}")]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Strip weekdays, ordinals and punctuation; rewrite month names as `Jan`..`Dec`.
///
/// Once a month name is found, dashes and slashes are plain separators
/// (`5-Mar-2021`).
fn canonicalize(text: &str) -> String {
    let mut result = PUNCTUATION.replace_all(text, " ").to_string();
    result = WEEKDAY.replace_all(&result, " ").to_string();
    result = ORDINAL.replace_all(&result, "$1").to_string();

    let mut has_month = false;
    for (re, short) in MONTHS.iter() {
        if re.is_match(&result) {
            has_month = true;
            result = re.replace_all(&result, *short).to_string();
        }
    }
    if has_month {
        result = result.replace(['-', '/'], " ");
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
