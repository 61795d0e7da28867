//! Aggregator: week logs → overview
//!
//! - Week summaries are emitted in week-index order, days in day-index order
//! - Duplicate day indices resolve last-write-wins by source path lexical order
//!   (within one file the later section wins); every duplicate is recorded as a
//!   `DayConflict` and logged, never dropped silently
//! - Days outside their log's week range become `RangeWarning`s
//!
//! The result depends only on the set of logs, not on their order.

use std::collections::BTreeMap;

use crate::config::LogbookConfig;
use crate::models::{DayConflict, DayRecord, Entry, Overview, RangeWarning, WeekLog, WeekSummary};

/// Default cap on key wins per week summary.
pub const DEFAULT_KEY_WINS_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub key_wins_limit: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            key_wins_limit: DEFAULT_KEY_WINS_LIMIT,
        }
    }
}

impl From<&LogbookConfig> for MergeOptions {
    fn from(config: &LogbookConfig) -> Self {
        Self {
            key_wins_limit: config.render.key_wins_limit,
        }
    }
}

/// Merge week logs into an overview with default options.
pub fn merge(logs: &[WeekLog]) -> Overview {
    merge_with(logs, &MergeOptions::default())
}

pub fn merge_with(logs: &[WeekLog], options: &MergeOptions) -> Overview {
    // Precedence order: later sources overwrite earlier ones.
    let mut ordered: Vec<&WeekLog> = logs.iter().collect();
    ordered.sort_by(|a, b| a.source.cmp(&b.source).then(a.week.cmp(&b.week)));

    let mut winners: BTreeMap<u32, (&WeekLog, &Entry)> = BTreeMap::new();
    let mut occurrences: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    let mut unnumbered = Vec::new();
    let mut range_warnings = Vec::new();

    for &log in &ordered {
        for entry in &log.entries {
            match entry.day {
                Some(day) => {
                    occurrences
                        .entry(day)
                        .or_default()
                        .push(log.source.clone());
                    winners.insert(day, (log, entry));
                }
                None => unnumbered.push(DayRecord {
                    week: log.week,
                    source: log.source.clone(),
                    entry: entry.clone(),
                    exercises: Vec::new(),
                }),
            }
        }

        for day in log.out_of_range_days() {
            tracing::warn!(
                "Day {} logged in {} falls outside week {}",
                day,
                log.source,
                log.week
            );
            range_warnings.push(RangeWarning {
                day,
                week: log.week,
                source: log.source.clone(),
            });
        }
    }

    let conflicts: Vec<DayConflict> = occurrences
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(day, sources)| {
            let winner = sources.last().cloned().unwrap_or_default();
            tracing::warn!(
                "Day {} appears {} times ({}); keeping {}",
                day,
                sources.len(),
                sources.join(", "),
                winner
            );
            DayConflict {
                day,
                sources,
                winner,
            }
        })
        .collect();

    let days: Vec<DayRecord> = winners
        .into_values()
        .map(|(log, entry)| DayRecord {
            week: log.week,
            source: log.source.clone(),
            entry: entry.clone(),
            exercises: Vec::new(),
        })
        .collect();

    unnumbered.sort_by_key(|r| r.week);
    range_warnings.sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.source.cmp(&b.source)));
    range_warnings.dedup();

    let weeks = summarize_weeks(&ordered, &days, options);

    tracing::info!(
        "Merged {} logs into {} weeks, {} days ({} conflicts)",
        logs.len(),
        weeks.len(),
        days.len(),
        conflicts.len()
    );

    Overview {
        weeks,
        days,
        unnumbered,
        conflicts,
        range_warnings,
        unmatched_exercises: Vec::new(),
    }
}

fn summarize_weeks(
    ordered: &[&WeekLog],
    days: &[DayRecord],
    options: &MergeOptions,
) -> Vec<WeekSummary> {
    let mut by_week: BTreeMap<u32, Vec<&WeekLog>> = BTreeMap::new();
    for &log in ordered {
        by_week.entry(log.week).or_default().push(log);
    }

    by_week
        .into_iter()
        .map(|(week, logs)| {
            let resolved: Vec<&DayRecord> = days.iter().filter(|r| r.week == week).collect();
            let titles: Vec<String> = resolved
                .iter()
                .map(|r| r.entry.title.clone())
                .filter(|t| !t.is_empty())
                .collect();

            let focus = logs
                .iter()
                .find_map(|l| l.focus.clone())
                .unwrap_or_else(|| titles.join(", "));

            let mut key_wins: Vec<String> = Vec::new();
            for win in logs.iter().flat_map(|l| l.key_wins.iter()) {
                if !key_wins.contains(win) {
                    key_wins.push(win.clone());
                }
            }
            if key_wins.is_empty() {
                key_wins = titles;
            }
            key_wins.truncate(options.key_wins_limit);

            let mut sources: Vec<String> = logs.iter().map(|l| l.source.clone()).collect();
            sources.dedup();

            WeekSummary {
                week,
                first_day: resolved.first().and_then(|r| r.day()),
                last_day: resolved.last().and_then(|r| r.day()),
                focus,
                key_wins,
                sources,
            }
        })
        .collect()
}
