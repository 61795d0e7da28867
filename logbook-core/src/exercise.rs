//! Exercise script headers
//!
//! Scripts open with a docstring in one of a few shapes:
//!
//! ```text
//! Day 1: Python Basics - Master Guide
//! Date: 2025-08-25
//!
//! ======================================
//! Python Learning - Week 02 Day 01 (Day 8 Overall)
//! TOPIC: EXCEPTION HANDLING
//! ======================================
//!
//! PYTHON FUNCTIONAL PROGRAMMING BASICS - DAY 16
//! ```
//!
//! Whatever is missing from the header is recovered from the path
//! (`Week 03/Day 02/day-16_01_basics.py`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::date::find_date;
use crate::markdown::trim_decoration;
use crate::models::{week_of_day, Exercise};
use crate::parse::week_from_path;

static OVERALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*day\s*0*(\d+)\s+overall\s*\)").expect("valid overall day regex")
});
static DAY_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^day\s*0*(\d+)\s*:\s*(.*)$").expect("valid day line regex"));
static BANNER_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[-–—:]\s*day\s*0*(\d+)\s*$").expect("valid banner day regex")
});
static FILE_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^day[-_ ]?0*(\d+)").expect("valid file day regex"));
static WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bweek[\s_\-]*0*(\d+)\b").expect("valid week regex"));
static TOPIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^topic\s*:\s*(.+)$").expect("valid topic regex"));
static DATE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^date\s*:\s*(.+)$").expect("valid date line regex"));

/// Index one exercise script from its path (relative, `/`-separated) and source.
pub fn parse_exercise(path: &str, source: &str) -> Exercise {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name);

    let lines: Vec<&str> = docstring(source)
        .map(|doc| doc.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
        .unwrap_or_default();

    let day = header_day(&lines).or_else(|| {
        FILE_DAY_RE
            .captures(file_name)
            .and_then(|caps| caps[1].parse().ok())
    });

    let week = lines
        .iter()
        .find_map(|l| WEEK_RE.captures(l).and_then(|caps| caps[1].parse().ok()))
        .or_else(|| week_from_path(path))
        .or_else(|| day.map(week_of_day));

    let date = lines
        .iter()
        .find_map(|l| DATE_LINE_RE.captures(l).and_then(|caps| find_date(&caps[1])));

    let title = header_title(&lines).unwrap_or_else(|| stem.to_string());

    Exercise {
        path: path.to_string(),
        week,
        day,
        title,
        date,
    }
}

/// Body of the leading docstring, after any shebang, encoding or comment lines.
fn docstring(source: &str) -> Option<&str> {
    let mut rest = source.strip_prefix('\u{feff}').unwrap_or(source);
    loop {
        let trimmed = rest.trim_start();
        if trimmed.starts_with('#') {
            rest = trimmed.split_once('\n').map(|(_, r)| r).unwrap_or("");
            continue;
        }
        rest = trimmed;
        break;
    }

    let rest = rest.trim_start_matches(['r', 'R', 'u', 'U']);
    let quote = ["\"\"\"", "'''"].into_iter().find(|q| rest.starts_with(*q))?;
    let body = &rest[quote.len()..];
    let end = body.find(quote).unwrap_or(body.len());
    Some(&body[..end])
}

fn header_day(lines: &[&str]) -> Option<u32> {
    lines
        .iter()
        .find_map(|l| OVERALL_RE.captures(l).and_then(|caps| caps[1].parse().ok()))
        .or_else(|| {
            lines
                .iter()
                .find_map(|l| DAY_LINE_RE.captures(l).and_then(|caps| caps[1].parse().ok()))
        })
        .or_else(|| {
            lines
                .iter()
                .find_map(|l| BANNER_DAY_RE.captures(l).and_then(|caps| caps[1].parse().ok()))
        })
}

fn header_title(lines: &[&str]) -> Option<String> {
    let from_day_line = lines
        .iter()
        .find_map(|l| DAY_LINE_RE.captures(l).map(|caps| trim_decoration(&caps[2])));
    let from_topic = || {
        lines
            .iter()
            .find_map(|l| TOPIC_RE.captures(l).map(|caps| trim_decoration(&caps[1])))
    };
    let from_banner = || {
        lines
            .iter()
            .find(|l| {
                !is_banner_rule(l)
                    && !l.to_lowercase().contains("python learning")
                    && !DATE_LINE_RE.is_match(l)
            })
            .map(|l| trim_decoration(&BANNER_DAY_RE.replace(l, "")))
    };

    from_day_line
        .filter(|t| !t.is_empty())
        .or_else(|| from_topic().filter(|t| !t.is_empty()))
        .or_else(|| from_banner().filter(|t| !t.is_empty()))
}

fn is_banner_rule(line: &str) -> bool {
    line.chars().count() >= 3 && line.chars().all(|c| "=-*#~_".contains(c))
}
