//! Date-header recognition for single lines of diary text.
//!
//! A line is a date header only when the *whole* line is a date
//! expression. Two notations are recognised:
//!
//! | Form | Examples |
//! |------|----------|
//! | Numeric `M/D/Y` (separators `/`, `-`, `.`) | `3/4/2024`, `03-04-24`, `12.31.2023` |
//! | Month name, optional ordinal and year | `March 4, 2024`, `Mar 4th`, `sept 9 2023` |
//!
//! Dates mentioned inside prose ("On Jan 5 I went…") are never headers.
//!
//! Day values are checked against `1..=31` only. There is no per-month or
//! leap-year validation, so `2/31/2024` resolves to `2024-02-31`.
//!
//! # Example
//!
//! ```rust
//! use diary_harness_core::date::resolve_date;
//!
//! assert_eq!(resolve_date("3/4/24", None).as_deref(), Some("2024-03-04"));
//! assert_eq!(resolve_date("March 4", Some(2021)).as_deref(), Some("2021-03-04"));
//! assert_eq!(resolve_date("On March 4 I woke up early", None), None);
//! ```

use std::sync::LazyLock;

use chrono::{Datelike, Local};
use regex::Regex;

/// `M[/-.]D[/-.]Y`, anchored to the whole line.
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})[/\-.]([0-9]{1,2})[/\-.]([0-9]{4}|[0-9]{2})$")
        .expect("numeric date pattern is valid")
});

/// `<MonthName> <Day>[st|nd|rd|th][[,] <Year>]`, anchored to the whole line.
static MONTH_NAME_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3,9}) ([0-9]{1,2})(?:st|nd|rd|th)?(?:,? ([0-9]{4}))?$")
        .expect("month-name date pattern is valid")
});

/// Look up a lowercase English month name or abbreviation.
///
/// `sept` is accepted alongside `sep`.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Format a year/month/day triple as `YYYY-MM-DD`.
///
/// Year is zero-padded to four digits, month and day to two. The triple is
/// not checked against the calendar.
pub fn to_iso_date(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Trim a line and collapse every whitespace run to a single space.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a line to an ISO `YYYY-MM-DD` date if the line is a date header.
///
/// The numeric form is tried first. A month-name header without a year
/// takes `default_year`, or the current local calendar year when
/// `default_year` is `None`.
///
/// Returns `None` for anything that is not exactly a supported date
/// expression, or whose month/day fall outside `1..=12` / `1..=31`.
pub fn resolve_date(line: &str, default_year: Option<i32>) -> Option<String> {
    let s = normalize_line(line);
    if s.is_empty() {
        return None;
    }

    resolve_numeric(&s).or_else(|| resolve_month_name(&s, default_year))
}

fn resolve_numeric(s: &str) -> Option<String> {
    let caps = NUMERIC_DATE.captures(s)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    // Years below 100 (`24`, `0024`) are read as 20xx.
    if year < 100 {
        year += 2000;
    }

    if is_valid_month(month) && is_valid_day(day) {
        Some(to_iso_date(year, month, day))
    } else {
        None
    }
}

fn resolve_month_name(s: &str, default_year: Option<i32>) -> Option<String> {
    let caps = MONTH_NAME_DATE.captures(s)?;
    let month = month_number(&caps[1].to_lowercase())?;
    let day: u32 = caps[2].parse().ok()?;
    if !is_valid_day(day) {
        return None;
    }

    let year = match caps.get(3) {
        Some(y) => y.as_str().parse().ok()?,
        None => default_year.unwrap_or_else(|| Local::now().year()),
    };

    Some(to_iso_date(year, month, day))
}

fn is_valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

fn is_valid_day(day: u32) -> bool {
    (1..=31).contains(&day)
}
