use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's log as written in a week log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// `None` when the heading carries no numeric day token.
    pub day: Option<u32>,
    pub date: Option<NaiveDate>,
    pub title: String,
    pub topics: Vec<String>,
    pub links: Vec<ResourceLink>,
    pub notes: String,
}

/// A `[label](href)` pair found inside a day section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub label: String,
    /// Href exactly as written.
    pub href: String,
    /// Percent-decoded href (`Day%2001/x.py` -> `Day 01/x.py`).
    pub target: String,
}

impl ResourceLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        let href = href.into();
        let target = match urlencoding::decode(&href) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => href.clone(),
        };
        Self {
            label: label.into(),
            href,
            target,
        }
    }

    /// True for relative paths and anchors, false for anything with a URL scheme.
    pub fn is_local(&self) -> bool {
        let Some((scheme, _)) = self.href.split_once(':') else {
            return true;
        };
        scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    }
}

impl Entry {
    /// An entry with nothing extracted beyond the heading.
    pub fn is_bare(&self) -> bool {
        self.date.is_none() && self.topics.is_empty() && self.links.is_empty() && self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_target_is_percent_decoded() {
        let link = ResourceLink::new("Basics", "Day%2001/day-01_python_basics.py");
        assert_eq!(link.href, "Day%2001/day-01_python_basics.py");
        assert_eq!(link.target, "Day 01/day-01_python_basics.py");
        assert!(link.is_local());
    }

    #[test]
    fn test_invalid_percent_sequence_keeps_raw_href() {
        let link = ResourceLink::new("odd", "notes%ZZ.md");
        assert_eq!(link.target, "notes%ZZ.md");
    }

    #[test]
    fn test_scheme_links_are_not_local() {
        assert!(!ResourceLink::new("docs", "https://docs.python.org/3/").is_local());
        assert!(!ResourceLink::new("mail", "mailto:someone@example.com").is_local());
        assert!(ResourceLink::new("anchor", "#day-2").is_local());
    }

    #[test]
    fn test_default_entry_is_bare() {
        let entry = Entry {
            day: Some(3),
            title: "Strings".to_string(),
            ..Entry::default()
        };
        assert!(entry.is_bare());
    }
}
