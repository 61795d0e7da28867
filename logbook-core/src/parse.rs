//! Log parser: markdown week log → day entries
//!
//! Splits a document on its top-level day headings and extracts, per section:
//! - day index, title and date from the heading and date line
//! - topics from list items in the lead block or under topic-like subheadings
//! - resource links and free-text notes
//!
//! Nothing here fails: anything unrecognised degrades to an empty field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::date::{find_date, is_bare_date_line, is_date_label, strip_date_tokens};
use crate::markdown::{self, Line};
use crate::models::{week_of_day, Entry, ResourceLink, WeekLog};

static DAY_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bday\b").expect("valid day word regex"));
static DAY_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bday\b[\s#:._\-]*(?:0*(\d+)\b)?").expect("valid day token regex")
});
static OVERALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(?\s*\bday\s*0*(\d+)\s+overall\b\s*\)?").expect("valid overall regex")
});
static WEEK_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bweek[\s#:._\-]*0*(\d+)\b").expect("valid week token regex")
});
static EMPTY_BRACKETS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\)|\[\s*\]").expect("valid empty brackets regex"));
static FOCUS_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[^\p{L}\p{N}]*(?:focus|goal|theme)\s*[:：]\s*(.+)$")
        .expect("valid focus line regex")
});

const RESOURCE_KEYWORDS: &[&str] = &[
    "resource", "link", "file", "code", "script", "exercise", "material", "reference", "reading",
];
const NOTE_KEYWORDS: &[&str] = &[
    "note", "reflect", "challenge", "takeaway", "next", "thought", "struggle", "question",
    "tomorrow",
];
const TOPIC_KEYWORDS: &[&str] = &[
    "learn", "topic", "cover", "concept", "stud", "progress", "accomplish", "highlight", "win",
    "did", "practice", "done", "built",
];
const FOCUS_HEADINGS: &[&str] = &["focus", "goal", "theme"];
const WIN_HEADINGS: &[&str] = &["win", "highlight", "achievement"];

/// What a subheading inside a day section introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    /// Lines before the first subheading.
    Lead,
    Topics,
    Notes,
    Resources,
    Other,
}

impl SectionKind {
    fn of(heading: &str) -> Self {
        let lower = markdown::plain_text(heading).to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
        if has(RESOURCE_KEYWORDS) {
            SectionKind::Resources
        } else if has(NOTE_KEYWORDS) {
            SectionKind::Notes
        } else if has(TOPIC_KEYWORDS) {
            SectionKind::Topics
        } else {
            SectionKind::Other
        }
    }
}

/// A day heading and the lines it owns.
struct DaySection<'a> {
    heading: &'a str,
    body: Vec<Line<'a>>,
}

/// A document cut into day sections and everything outside them.
struct Outline<'a> {
    sections: Vec<DaySection<'a>>,
    outside: Vec<Line<'a>>,
}

fn outline(document: &str) -> Outline<'_> {
    let lines = markdown::classify_lines(document);

    let top = lines
        .iter()
        .filter_map(|line| match line {
            Line::Heading { level, text } if DAY_WORD_RE.is_match(text) => Some(*level),
            _ => None,
        })
        .min();

    let mut sections: Vec<DaySection<'_>> = Vec::new();
    let mut outside = Vec::new();
    let mut in_section = false;

    for line in lines {
        if let (Line::Heading { level, text }, Some(top)) = (line, top) {
            if level <= top {
                if level == top && DAY_WORD_RE.is_match(text) {
                    sections.push(DaySection {
                        heading: text,
                        body: Vec::new(),
                    });
                    in_section = true;
                    continue;
                }
                in_section = false;
            }
        }
        match sections.last_mut() {
            Some(section) if in_section => section.body.push(line),
            _ => outside.push(line),
        }
    }

    Outline { sections, outside }
}

/// Parse a markdown document into day entries.
///
/// Entries come back ordered by day index (stable with respect to document
/// order, unnumbered entries first). A document without day headings yields an
/// empty vector.
pub fn parse(document: &str) -> Vec<Entry> {
    entries(&outline(document))
}

/// Parse a week log file. `source` is the path relative to the journal root
/// and is used both for week detection and as the tie-break key in merges.
pub fn parse_week_log(source: &str, document: &str) -> WeekLog {
    let outline = outline(document);
    let entries = entries(&outline);

    let week = week_from_headings(&outline)
        .or_else(|| week_from_path(source))
        .or_else(|| entries.iter().filter_map(|e| e.day).min().map(week_of_day))
        .unwrap_or_else(|| {
            tracing::debug!("No week index found for {}", source);
            0
        });

    let (focus, key_wins) = week_metadata(&outline.outside);

    tracing::debug!(
        "Parsed {}: week {}, {} entries",
        source,
        week,
        entries.len()
    );

    WeekLog {
        week,
        source: source.to_string(),
        focus,
        key_wins,
        entries,
    }
}

fn entries(outline: &Outline<'_>) -> Vec<Entry> {
    let mut entries: Vec<Entry> = outline.sections.iter().map(parse_section).collect();

    let numbered: Vec<u32> = entries.iter().filter_map(|e| e.day).collect();
    if numbered.windows(2).any(|w| w[0] > w[1]) {
        tracing::warn!("Day headings out of order: {:?}; sorting by day index", numbered);
    }
    entries.sort_by_key(|e| e.day);
    entries
}

fn parse_section(section: &DaySection<'_>) -> Entry {
    let (day, title) = parse_heading(section.heading);
    let mut kind = SectionKind::Lead;
    let mut labelled_date = None;
    let mut lead_date = None;
    let mut topics = Vec::new();
    let mut notes: Vec<String> = Vec::new();
    let mut links: Vec<ResourceLink> = markdown::links(section.heading);
    let mut seen_list = false;

    for line in &section.body {
        match *line {
            Line::Heading { text, .. } => {
                kind = SectionKind::of(text);
                links.extend(markdown::links(text));
            }
            Line::ListItem { text, .. } => {
                links.extend(markdown::links(text));
                if is_bare_date_line(text) {
                    labelled_date = labelled_date.or(find_date(text));
                    continue;
                }
                seen_list = true;
                let item = markdown::trim_decoration(&markdown::plain_text(text));
                if item.is_empty() {
                    continue;
                }
                match kind {
                    SectionKind::Lead | SectionKind::Topics => topics.push(item),
                    SectionKind::Notes => notes.push(item),
                    SectionKind::Resources | SectionKind::Other => {}
                }
            }
            Line::Text(text) => {
                links.extend(markdown::links(text));
                if let Some(date) = find_date(text) {
                    if is_date_label(text) {
                        labelled_date = labelled_date.or(Some(date));
                        continue;
                    }
                    if kind == SectionKind::Lead && !seen_list {
                        lead_date = lead_date.or(Some(date));
                    }
                    if markdown::trim_decoration(&strip_date_tokens(text)).is_empty() {
                        continue;
                    }
                }
                if !is_table_rule(text) {
                    notes.push(text.to_string());
                }
            }
            Line::Code | Line::Blank => {}
        }
    }

    let mut unique_links: Vec<ResourceLink> = Vec::with_capacity(links.len());
    for link in links {
        if !unique_links.contains(&link) {
            unique_links.push(link);
        }
    }

    Entry {
        day,
        date: labelled_date
            .or_else(|| find_date(section.heading))
            .or(lead_date),
        title,
        topics,
        links: unique_links,
        notes: notes.join("\n"),
    }
}

/// Day index and title from a day heading's text.
fn parse_heading(heading: &str) -> (Option<u32>, String) {
    let overall = OVERALL_RE
        .captures(heading)
        .and_then(|c| c[1].parse::<u32>().ok());
    let week = WEEK_TOKEN_RE
        .captures(heading)
        .and_then(|c| c[1].parse::<u32>().ok());
    let token = DAY_TOKEN_RE
        .captures(heading)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    let day = match (overall, week, token) {
        (Some(day), _, _) => Some(day),
        // "Week 2 – Day 1" counts days within the week.
        (None, Some(week), Some(day)) if week > 1 && (1..=7).contains(&day) => {
            (week - 1).checked_mul(7).and_then(|d| d.checked_add(day))
        }
        (None, _, token) => token,
    };

    let stripped = OVERALL_RE.replace_all(heading, " ");
    let stripped = WEEK_TOKEN_RE.replace_all(&stripped, " ");
    let stripped = DAY_TOKEN_RE.replace(&stripped, " ");
    let date_free = strip_date_tokens(&stripped);
    let date_free = EMPTY_BRACKETS_RE.replace_all(&date_free, " ");
    let title = markdown::trim_decoration(&markdown::plain_text(&date_free));

    (day, title)
}

fn is_table_rule(text: &str) -> bool {
    text.starts_with('|')
        && text
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn week_from_headings(outline: &Outline<'_>) -> Option<u32> {
    let outside = outline.outside.iter().filter_map(|l| match l {
        Line::Heading { text, .. } => Some(*text),
        _ => None,
    });
    let headings = outline.sections.iter().map(|s| s.heading);
    outside
        .chain(headings)
        .find_map(|text| WEEK_TOKEN_RE.captures(text))
        .and_then(|c| c[1].parse().ok())
}

/// Week index from a `Week 01`, `week-1` or `week_1` path component.
pub fn week_from_path(source: &str) -> Option<u32> {
    source.split(|c: char| c == '/' || c == '\\').find_map(|component| {
        WEEK_TOKEN_RE
            .captures(component)
            .and_then(|c| c[1].parse().ok())
    })
}

fn week_metadata(outside: &[Line<'_>]) -> (Option<String>, Vec<String>) {
    #[derive(PartialEq)]
    enum Block {
        None,
        Focus,
        Wins,
    }

    let mut focus: Option<String> = None;
    let mut heading_focus: Option<String> = None;
    let mut wins = Vec::new();
    let mut block = Block::None;

    for line in outside {
        match *line {
            Line::Heading { text, .. } => {
                let lower = markdown::plain_text(text).to_lowercase();
                block = if FOCUS_HEADINGS.iter().any(|k| lower.contains(k)) {
                    Block::Focus
                } else if WIN_HEADINGS.iter().any(|k| lower.contains(k)) {
                    Block::Wins
                } else {
                    Block::None
                };
            }
            Line::Text(text) | Line::ListItem { text, .. } => {
                let plain = markdown::plain_text(text);
                if focus.is_none() {
                    if let Some(caps) = FOCUS_LINE_RE.captures(&plain) {
                        let value = markdown::trim_decoration(&caps[1]);
                        if !value.is_empty() {
                            focus = Some(value);
                            continue;
                        }
                    }
                }
                match block {
                    Block::Focus if heading_focus.is_none() => {
                        let value = markdown::trim_decoration(&plain);
                        if !value.is_empty() {
                            heading_focus = Some(value);
                        }
                    }
                    Block::Wins if matches!(line, Line::ListItem { .. }) => {
                        let value = markdown::trim_decoration(&plain);
                        if !value.is_empty() {
                            wins.push(value);
                        }
                    }
                    _ => {}
                }
            }
            Line::Code | Line::Blank => {}
        }
    }

    (focus.or(heading_focus), wins)
}
