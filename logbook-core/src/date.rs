//! Date token recognition for journal headings, date lines and script headers.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b").expect("valid numeric date regex")
});
static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+{}\.?,?\s+(\d{{4}})\b",
        MONTHS
    ))
    .expect("valid day-month date regex")
});
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b",
        MONTHS
    ))
    .expect("valid month-day date regex")
});
static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(📅|🗓|\bdate\b)").expect("valid date label regex"));
static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:mon|tues?|wed(?:nes)?|thu(?:rs?)?|fri|sat(?:ur)?|sun)(?:day)?\b")
        .expect("valid weekday regex")
});

/// First valid calendar date in `text`, by position.
///
/// Tokens that look like dates but are not valid calendar days (`2025-13-45`)
/// are skipped.
pub fn find_date(text: &str) -> Option<NaiveDate> {
    let mut candidates: Vec<(usize, Option<NaiveDate>)> = Vec::new();

    for caps in NUMERIC_RE.captures_iter(text) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        candidates.push((start, ymd(&caps[1], &caps[2], &caps[3])));
    }
    for caps in DAY_MONTH_RE.captures_iter(text) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let date = month_number(&caps[2]).and_then(|m| ymd(&caps[3], &m.to_string(), &caps[1]));
        candidates.push((start, date));
    }
    for caps in MONTH_DAY_RE.captures_iter(text) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let date = month_number(&caps[1]).and_then(|m| ymd(&caps[3], &m.to_string(), &caps[2]));
        candidates.push((start, date));
    }

    candidates.sort_by_key(|(start, _)| *start);
    candidates.into_iter().find_map(|(_, date)| date)
}

/// `text` with every date-looking token removed, valid or not.
pub fn strip_date_tokens(text: &str) -> String {
    let text = NUMERIC_RE.replace_all(text, "");
    let text = DAY_MONTH_RE.replace_all(&text, "");
    MONTH_DAY_RE.replace_all(&text, "").into_owned()
}

/// True when the line announces a date (`📅`, `🗓`, `Date:`).
pub fn is_date_label(text: &str) -> bool {
    LABEL_RE.is_match(text)
}

/// True when a labelled line carries a date and nothing else worth keeping.
///
/// `📅 2025-10-01 (Wed)` qualifies; `Practiced date formatting with 2025-01-15`
/// does not.
pub fn is_bare_date_line(text: &str) -> bool {
    if !is_date_label(text) || find_date(text).is_none() {
        return false;
    }
    let rest = strip_date_tokens(text);
    let rest = LABEL_RE.replace_all(&rest, "");
    !WEEKDAY_RE.replace_all(&rest, "").chars().any(char::is_alphanumeric)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_date_after_emoji() {
        assert_eq!(find_date("📅 2025-08-26"), date(2025, 8, 26));
        assert_eq!(find_date("Date: 2025/09/03"), date(2025, 9, 3));
    }

    #[test]
    fn test_written_month_forms() {
        assert_eq!(find_date("Logged on 4 September 2025"), date(2025, 9, 4));
        assert_eq!(find_date("Sept 18th, 2025 — sets"), date(2025, 9, 18));
        assert_eq!(find_date("aug. 25, 2025"), date(2025, 8, 25));
    }

    #[test]
    fn test_invalid_calendar_date_is_skipped() {
        assert_eq!(find_date("2025-13-45"), None);
        assert_eq!(find_date("2025-02-30 then 2025-03-01"), date(2025, 3, 1));
    }

    #[test]
    fn test_earliest_token_wins() {
        assert_eq!(
            find_date("Sept 1, 2025 (revisited 2025-09-19)"),
            date(2025, 9, 1)
        );
    }

    #[test]
    fn test_strip_date_tokens() {
        assert_eq!(strip_date_tokens("File Handling (2025-09-20)"), "File Handling ()");
        assert_eq!(strip_date_tokens("September 18, 2025").trim(), "");
    }

    #[test]
    fn test_no_date() {
        assert_eq!(find_date("Day 12 – exceptions"), None);
        assert!(!is_date_label("Updated notes"));
        assert!(is_date_label("🗓️ 2025-09-18"));
        assert!(is_date_label("**Date:** 2025-09-18"));
    }

    #[test]
    fn test_bare_date_line() {
        assert!(is_bare_date_line("📅 2025-10-01"));
        assert!(is_bare_date_line("**Date:** Wed, 1 October 2025"));
        assert!(!is_bare_date_line("Practiced date formatting with 2025-01-15 examples"));
        assert!(!is_bare_date_line("📅 no date yet"));
        assert!(!is_bare_date_line("2025-10-01"));
    }
}
