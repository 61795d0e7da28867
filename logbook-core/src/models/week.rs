use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::Entry;

/// Number of days covered by one week log.
pub const DAYS_PER_WEEK: u32 = 7;

/// Entries parsed from one markdown log file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLog {
    /// 1-based week index; 0 when nothing in the file or its path names a week.
    pub week: u32,
    /// Path of the log relative to the journal root, `/`-separated.
    pub source: String,
    pub focus: Option<String>,
    pub key_wins: Vec<String>,
    /// Sorted by day index, unnumbered entries first.
    pub entries: Vec<Entry>,
}

impl WeekLog {
    /// Overall day indices this week is expected to cover (`8..=14` for week 2).
    ///
    /// `None` when the week is unknown or its days do not fit in a `u32`.
    pub fn day_range(&self) -> Option<RangeInclusive<u32>> {
        if self.week == 0 {
            return None;
        }
        let first = (self.week - 1).checked_mul(DAYS_PER_WEEK)?.checked_add(1)?;
        let last = self.week.checked_mul(DAYS_PER_WEEK)?;
        Some(first..=last)
    }

    /// Day indices that fall outside `day_range`. Empty when the week is unknown.
    pub fn out_of_range_days(&self) -> Vec<u32> {
        let Some(range) = self.day_range() else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter_map(|e| e.day)
            .filter(|day| !range.contains(day))
            .collect()
    }

    /// Nothing parsed at all: no entries and no week-level metadata.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.focus.is_none() && self.key_wins.is_empty()
    }
}

/// Week a given overall day index belongs to.
pub fn week_of_day(day: u32) -> u32 {
    if day == 0 {
        return 0;
    }
    (day - 1) / DAYS_PER_WEEK + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32) -> Entry {
        Entry {
            day: Some(day),
            ..Entry::default()
        }
    }

    #[test]
    fn test_day_range_for_second_week() {
        let log = WeekLog {
            week: 2,
            ..WeekLog::default()
        };
        assert_eq!(log.day_range(), Some(8..=14));
    }

    #[test]
    fn test_out_of_range_days_reported() {
        let log = WeekLog {
            week: 1,
            entries: vec![entry(6), entry(7), entry(8)],
            ..WeekLog::default()
        };
        assert_eq!(log.out_of_range_days(), vec![8]);
    }

    #[test]
    fn test_unknown_week_has_no_range() {
        let log = WeekLog {
            entries: vec![entry(40)],
            ..WeekLog::default()
        };
        assert_eq!(log.day_range(), None);
        assert!(log.out_of_range_days().is_empty());
    }

    #[test]
    fn test_huge_week_has_no_range() {
        let log = WeekLog {
            week: 999_999_999,
            entries: vec![entry(3)],
            ..WeekLog::default()
        };
        assert_eq!(log.day_range(), None);
        assert!(log.out_of_range_days().is_empty());
    }

    #[test]
    fn test_week_of_day_boundaries() {
        assert_eq!(week_of_day(0), 0);
        assert_eq!(week_of_day(1), 1);
        assert_eq!(week_of_day(7), 1);
        assert_eq!(week_of_day(8), 2);
        assert_eq!(week_of_day(19), 3);
    }
}
