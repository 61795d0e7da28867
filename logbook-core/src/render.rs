//! Overview → markdown / JSON
//!
//! The markdown document is a week table and a day table followed by the
//! optional diagnostic sections (conflicts, range warnings, unnumbered
//! entries, unmatched exercises), each emitted only when it has content.

use crate::config::RenderConfig;
use crate::error::LogbookError;
use crate::markdown::{link_path, table_cell};
use crate::models::{DayRecord, Overview, WeekSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            title: config.title.clone(),
        }
    }
}

pub fn render_markdown(overview: &Overview, options: &RenderOptions) -> String {
    let mut out: Vec<String> = vec![format!("# {}", options.title.trim()), String::new()];

    out.push("## Weeks".to_string());
    out.push(String::new());
    out.push("| Week | Days | Focus | Key wins | Logs |".to_string());
    out.push("| --- | --- | --- | --- | --- |".to_string());
    for week in &overview.weeks {
        out.push(week_row(week));
    }
    out.push(String::new());

    out.push("## Days".to_string());
    out.push(String::new());
    out.push("| Day | Date | Title | Topics | Exercises |".to_string());
    out.push("| --- | --- | --- | --- | --- |".to_string());
    for record in &overview.days {
        out.push(day_row(record));
    }
    out.push(String::new());

    if !overview.conflicts.is_empty() {
        out.push("## Conflicts".to_string());
        out.push(String::new());
        for conflict in &overview.conflicts {
            let sources: Vec<String> = conflict.sources.iter().map(|s| format!("`{}`", s)).collect();
            out.push(format!(
                "- Day {}: {} (kept `{}`)",
                conflict.day,
                sources.join(", "),
                conflict.winner
            ));
        }
        out.push(String::new());
    }

    if !overview.range_warnings.is_empty() {
        out.push("## Range warnings".to_string());
        out.push(String::new());
        for warning in &overview.range_warnings {
            out.push(format!(
                "- Day {} in `{}` is outside week {}",
                warning.day, warning.source, warning.week
            ));
        }
        out.push(String::new());
    }

    if !overview.unnumbered.is_empty() {
        out.push("## Unnumbered entries".to_string());
        out.push(String::new());
        for record in &overview.unnumbered {
            out.push(format!(
                "- {} ([{}]({}))",
                display_title(&record.entry.title),
                record.source,
                link_path(&record.source)
            ));
        }
        out.push(String::new());
    }

    if !overview.unmatched_exercises.is_empty() {
        out.push("## Unmatched exercises".to_string());
        out.push(String::new());
        for exercise in &overview.unmatched_exercises {
            out.push(format!(
                "- [{}]({})",
                display_title(&exercise.title),
                link_path(&exercise.path)
            ));
        }
        out.push(String::new());
    }

    out.join("\n")
}

/// Pretty JSON of the whole overview; dates serialize as `YYYY-MM-DD`.
pub fn render_json(overview: &Overview) -> Result<String, LogbookError> {
    Ok(serde_json::to_string_pretty(overview)?)
}

fn week_row(week: &WeekSummary) -> String {
    let label = if week.week == 0 {
        "?".to_string()
    } else {
        week.week.to_string()
    };
    let days = match (week.first_day, week.last_day) {
        (Some(first), Some(last)) if first == last => first.to_string(),
        (Some(first), Some(last)) => format!("{}-{}", first, last),
        _ => String::new(),
    };
    let wins: Vec<String> = week.key_wins.iter().map(|w| table_cell(w)).collect();
    let logs: Vec<String> = week
        .sources
        .iter()
        .map(|s| format!("[{}]({})", table_cell(s), link_path(s)))
        .collect();

    format!(
        "| {} | {} | {} | {} | {} |",
        label,
        days,
        table_cell(&week.focus),
        wins.join("; "),
        logs.join(", ")
    )
}

fn day_row(record: &DayRecord) -> String {
    let day = record.day().map(|d| d.to_string()).unwrap_or_default();
    let date = record
        .entry
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let topics: Vec<String> = record.entry.topics.iter().map(|t| table_cell(t)).collect();

    format!(
        "| {} | {} | {} | {} | {} |",
        day,
        date,
        table_cell(&record.entry.title),
        topics.join(", "),
        record.exercises.len()
    )
}

fn display_title(title: &str) -> &str {
    if title.is_empty() {
        "(untitled)"
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayConflict, Entry, Exercise, RangeWarning};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample() -> Overview {
        Overview {
            weeks: vec![WeekSummary {
                week: 1,
                first_day: Some(1),
                last_day: Some(2),
                focus: "Python | basics".to_string(),
                key_wins: vec!["First script".to_string(), "Loops".to_string()],
                sources: vec!["Week 01/README.md".to_string()],
            }],
            days: vec![DayRecord {
                week: 1,
                source: "Week 01/README.md".to_string(),
                entry: Entry {
                    day: Some(2),
                    date: NaiveDate::from_ymd_opt(2025, 8, 26),
                    title: "Control Flow".to_string(),
                    topics: vec!["if/elif".to_string(), "for loops".to_string()],
                    ..Entry::default()
                },
                exercises: vec![Exercise {
                    path: "Week 01/Day 02/day-02_loops.py".to_string(),
                    week: Some(1),
                    day: Some(2),
                    title: "Control Flow".to_string(),
                    date: None,
                }],
            }],
            ..Overview::default()
        }
    }

    // ========================================================================
    // TEST 1: week and day tables
    // ========================================================================
    #[test]
    fn test_tables() {
        let doc = render_markdown(&sample(), &RenderOptions::default());

        assert!(doc.starts_with("# Learning Journal Overview\n"));
        assert!(doc.contains(
            "| 1 | 1-2 | Python \\| basics | First script; Loops | [Week 01/README.md](Week%2001/README.md) |"
        ));
        assert!(doc.contains("| 2 | 2025-08-26 | Control Flow | if/elif, for loops | 1 |"));
    }

    // ========================================================================
    // TEST 2: diagnostic sections only when non-empty
    // ========================================================================
    #[test]
    fn test_optional_sections() {
        let clean = render_markdown(&sample(), &RenderOptions::default());
        assert!(!clean.contains("## Conflicts"));
        assert!(!clean.contains("## Range warnings"));
        assert!(!clean.contains("## Unnumbered entries"));
        assert!(!clean.contains("## Unmatched exercises"));

        let mut overview = sample();
        overview.conflicts.push(DayConflict {
            day: 8,
            sources: vec!["a.md".to_string(), "b.md".to_string()],
            winner: "b.md".to_string(),
        });
        overview.range_warnings.push(RangeWarning {
            day: 9,
            week: 1,
            source: "a.md".to_string(),
        });
        overview.unmatched_exercises.push(Exercise {
            path: "misc/scratch pad.py".to_string(),
            week: None,
            day: None,
            title: "scratch pad".to_string(),
            date: None,
        });

        let doc = render_markdown(&overview, &RenderOptions::default());
        assert!(doc.contains("- Day 8: `a.md`, `b.md` (kept `b.md`)"));
        assert!(doc.contains("- Day 9 in `a.md` is outside week 1"));
        assert!(doc.contains("- [scratch pad](misc/scratch%20pad.py)"));
        assert!(!doc.contains("## Unnumbered entries"));
    }

    #[test]
    fn test_custom_title_and_unknown_week() {
        let overview = Overview {
            weeks: vec![WeekSummary {
                week: 0,
                sources: vec!["notes.md".to_string()],
                ..WeekSummary::default()
            }],
            ..Overview::default()
        };
        let options = RenderOptions {
            title: "My Python Journey".to_string(),
        };
        let doc = render_markdown(&overview, &options);
        assert!(doc.starts_with("# My Python Journey"));
        assert!(doc.contains("| ? |  |  |  | [notes.md](notes.md) |"));
    }

    #[test]
    fn test_json_uses_iso_dates() {
        let json = render_json(&sample()).unwrap();
        assert!(json.contains("\"date\": \"2025-08-26\""));

        let back: Overview = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
