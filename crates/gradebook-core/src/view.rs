//! Filtered and sorted projections of the roster.
//!
//! A view is recomputed from scratch whenever the roster or any of its
//! inputs change. Identical inputs always give an identical ordering: every
//! sort is stable, so ties keep roster order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Grade, StudentRecord};

/// Column to order the view by.
///
/// One vocabulary everywhere: [`Display`](fmt::Display) prints the canonical
/// key, [`FromStr`] accepts it plus a few aliases, and serde goes through
/// [`SortKey::from_key`], so an unknown key in config leaves rows unsorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    Name,
    /// Highest first.
    Total,
    /// Highest first.
    Average,
    /// Ascending by letter.
    Grade,
    StudentId,
    /// Keep filtered order.
    #[default]
    Unsorted,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Name,
        SortKey::Total,
        SortKey::Average,
        SortKey::Grade,
        SortKey::StudentId,
        SortKey::Unsorted,
    ];

    /// Lenient lookup: unknown keys leave the view unsorted.
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_else(|e: String| {
            tracing::warn!("{e}, leaving rows unsorted");
            SortKey::Unsorted
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Total => write!(f, "total"),
            SortKey::Average => write!(f, "average"),
            SortKey::Grade => write!(f, "grade"),
            SortKey::StudentId => write!(f, "studentId"),
            SortKey::Unsorted => write!(f, "unsorted"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "total" => Ok(SortKey::Total),
            "average" | "avg" => Ok(SortKey::Average),
            "grade" => Ok(SortKey::Grade),
            "studentid" | "student_id" | "student-id" | "id" => Ok(SortKey::StudentId),
            "" | "unsorted" | "none" => Ok(SortKey::Unsorted),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl From<String> for SortKey {
    fn from(key: String) -> Self {
        SortKey::from_key(&key)
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

/// Everything a view is derived from besides the roster itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Case-insensitive substring of name or id. Empty matches everything.
    pub search: String,
    /// `None` matches every grade.
    pub grade_filter: Option<Grade>,
    pub sort_key: SortKey,
}

impl ViewQuery {
    fn matches(&self, needle: &str, record: &StudentRecord) -> bool {
        let matches_search = needle.is_empty()
            || record.name().to_lowercase().contains(needle)
            || record
                .student_id()
                .is_some_and(|id| id.to_lowercase().contains(needle));
        let matches_grade = self.grade_filter.map_or(true, |g| record.grade() == g);
        matches_search && matches_grade
    }
}

/// The ordered subset of the roster currently on display.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterView {
    pub query: ViewQuery,
    pub rows: Vec<StudentRecord>,
}

impl RosterView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().filter_map(|r| r.student_id()).collect()
    }
}

/// Filter then sort `roster` according to `query`.
pub fn compute_view(roster: &[StudentRecord], query: &ViewQuery) -> RosterView {
    let needle = query.search.to_lowercase();
    let mut rows: Vec<StudentRecord> = roster
        .iter()
        .filter(|r| query.matches(&needle, r))
        .cloned()
        .collect();

    sort_rows(&mut rows, query.sort_key);

    tracing::debug!(
        roster = roster.len(),
        shown = rows.len(),
        sort = %query.sort_key,
        "view recomputed"
    );

    RosterView {
        query: query.clone(),
        rows,
    }
}

fn sort_rows(rows: &mut [StudentRecord], key: SortKey) {
    match key {
        SortKey::Name => rows.sort_by(|a, b| locale_cmp(a.name(), b.name())),
        SortKey::Total => rows.sort_by(|a, b| b.total().total_cmp(&a.total())),
        SortKey::Average => rows.sort_by_key(|r| std::cmp::Reverse(r.average())),
        SortKey::Grade => rows.sort_by_key(|r| r.grade()),
        SortKey::StudentId => {
            rows.sort_by(|a, b| a.student_id().unwrap_or("").cmp(b.student_id().unwrap_or("")))
        }
        SortKey::Unsorted => {}
    }
}

/// Approximates a collator: case-insensitive first, then lowercase before
/// uppercase.
///
/// Letters are compared by code point after lowercasing, so accented names
/// do not sort next to their base letter (`Zoë` lands after `Zof`).
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
