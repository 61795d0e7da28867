use serde::{Deserialize, Serialize};

use super::{Entry, Exercise};

/// Read-only summary derived from every week log of a journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// One record per distinct week index, ascending.
    pub weeks: Vec<WeekSummary>,
    /// Resolved day entries, strictly increasing by day index.
    pub days: Vec<DayRecord>,
    /// Entries whose heading had no numeric day token, in week then source order.
    pub unnumbered: Vec<DayRecord>,
    pub conflicts: Vec<DayConflict>,
    pub range_warnings: Vec<RangeWarning>,
    pub unmatched_exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub week: u32,
    pub first_day: Option<u32>,
    pub last_day: Option<u32>,
    pub focus: String,
    pub key_wins: Vec<String>,
    /// Log files contributing to this week, lexical order.
    pub sources: Vec<String>,
}

/// An entry together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub week: u32,
    pub source: String,
    pub entry: Entry,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl DayRecord {
    pub fn day(&self) -> Option<u32> {
        self.entry.day
    }
}

/// A day index that appeared in more than one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConflict {
    pub day: u32,
    /// Every occurrence in precedence order; the last one won.
    pub sources: Vec<String>,
    pub winner: String,
}

/// A day logged in a week whose range does not contain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeWarning {
    pub day: u32,
    pub week: u32,
    pub source: String,
}

impl Overview {
    pub fn day(&self, day: u32) -> Option<&DayRecord> {
        self.days
            .binary_search_by_key(&day, |r| r.day().unwrap_or(0))
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn week(&self, week: u32) -> Option<&WeekSummary> {
        self.weeks.iter().find(|w| w.week == week)
    }

    /// Attach exercise scripts to the day records sharing their overall day index.
    ///
    /// Replaces any previously attached exercises, so calling it twice with the
    /// same input yields the same overview.
    pub fn with_exercises(mut self, exercises: &[Exercise]) -> Self {
        for record in &mut self.days {
            record.exercises.clear();
        }
        self.unmatched_exercises.clear();

        let mut sorted: Vec<&Exercise> = exercises.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        for exercise in sorted {
            let slot = exercise.day.and_then(|day| {
                self.days
                    .binary_search_by_key(&day, |r| r.day().unwrap_or(0))
                    .ok()
            });
            match slot {
                Some(i) => self.days[i].exercises.push(exercise.clone()),
                None => {
                    tracing::debug!("No logged day for exercise {}", exercise.path);
                    self.unmatched_exercises.push(exercise.clone());
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32) -> DayRecord {
        DayRecord {
            week: 1,
            source: "week-01.md".to_string(),
            entry: Entry {
                day: Some(day),
                title: format!("Day {}", day),
                ..Entry::default()
            },
            exercises: Vec::new(),
        }
    }

    fn exercise(path: &str, day: Option<u32>) -> Exercise {
        Exercise {
            path: path.to_string(),
            week: Some(1),
            day,
            title: path.to_string(),
            date: None,
        }
    }

    #[test]
    fn test_day_lookup() {
        let overview = Overview {
            days: vec![record(1), record(2), record(5)],
            ..Overview::default()
        };
        assert_eq!(overview.day(5).map(|r| r.entry.title.as_str()), Some("Day 5"));
        assert!(overview.day(3).is_none());
    }

    #[test]
    fn test_exercises_attach_by_day() {
        let overview = Overview {
            days: vec![record(1), record(2)],
            ..Overview::default()
        }
        .with_exercises(&[
            exercise("Day 02/b.py", Some(2)),
            exercise("Day 01/a.py", Some(1)),
            exercise("Day 09/z.py", Some(9)),
            exercise("misc.py", None),
        ]);

        assert_eq!(overview.days[0].exercises.len(), 1);
        assert_eq!(overview.days[1].exercises[0].path, "Day 02/b.py");
        let unmatched: Vec<&str> = overview
            .unmatched_exercises
            .iter()
            .map(|e| e.path.as_str())
            .collect();
        assert_eq!(unmatched, vec!["Day 09/z.py", "misc.py"]);
    }

    #[test]
    fn test_with_exercises_is_repeatable() {
        let exercises = [exercise("Day 01/a.py", Some(1)), exercise("x.py", None)];
        let once = Overview {
            days: vec![record(1)],
            ..Overview::default()
        }
        .with_exercises(&exercises);
        let twice = once.clone().with_exercises(&exercises);
        assert_eq!(once, twice);
    }
}
