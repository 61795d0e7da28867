use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One standalone exercise script, indexed by its docstring header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Path relative to the journal root, `/`-separated.
    pub path: String,
    pub week: Option<u32>,
    /// Overall day index (Week 02 / Day 01 is day 8).
    pub day: Option<u32>,
    pub title: String,
    pub date: Option<NaiveDate>,
}
