//! Core data model types for gradebook.
//!
//! A [`StudentRecord`] keeps its derived fields private so that `total`,
//! `average` and `grade` can only ever come out of the grade deriver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::grade;

/// Number of marks entered per student.
pub const MARK_COUNT: usize = 5;

/// A letter grade.
///
/// Variants are declared in letter order, so the derived `Ord` is plain
/// alphabetical order (which for this letter set also happens to be rank
/// order, best first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// All grades in chart order.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn is_failing(self) -> bool {
        self == Grade::F
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            other => Err(format!("unknown grade: {other}")),
        }
    }
}

/// Raw, unvalidated form input for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub name: String,
    pub marks: [String; MARK_COUNT],
}

impl EntryForm {
    pub fn new(name: impl Into<String>, marks: [&str; MARK_COUNT]) -> Self {
        Self {
            name: name.into(),
            marks: marks.map(str::to_string),
        }
    }
}

/// A single student's marks plus the values derived from them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RecordWire")]
pub struct StudentRecord {
    student_id: Option<String>,
    name: String,
    marks: [f64; MARK_COUNT],
    total: f64,
    average: i64,
    grade: Grade,
}

impl StudentRecord {
    pub(crate) fn from_parts(
        name: String,
        marks: [f64; MARK_COUNT],
        total: f64,
        average: i64,
        grade: Grade,
    ) -> Self {
        Self {
            student_id: None,
            name,
            marks,
            total,
            average,
            grade,
        }
    }

    /// Attach the id the service assigned.
    pub fn with_id(mut self, student_id: impl Into<String>) -> Self {
        let id = student_id.into();
        self.student_id = if id.is_empty() { None } else { Some(id) };
        self
    }

    /// The service-assigned id, or `None` for a record not yet persisted.
    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.student_id.is_none()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marks(&self) -> [f64; MARK_COUNT] {
        self.marks
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn average(&self) -> i64 {
        self.average
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }
}

/// Shape of a record on the wire. Derived fields are read but not trusted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordWire {
    #[serde(default)]
    student_id: Option<String>,
    #[serde(default)]
    name: String,
    mark1: f64,
    mark2: f64,
    mark3: f64,
    mark4: f64,
    mark5: f64,
    #[serde(default)]
    grade: Option<String>,
}

impl From<RecordWire> for StudentRecord {
    fn from(wire: RecordWire) -> Self {
        let marks = [wire.mark1, wire.mark2, wire.mark3, wire.mark4, wire.mark5];
        let record = grade::derive_unchecked(wire.name.trim(), marks);
        let record = match wire.student_id {
            Some(id) => record.with_id(id),
            None => record,
        };

        if let Some(supplied) = wire.grade.as_deref().filter(|g| !g.is_empty()) {
            if supplied != record.grade.as_str() {
                tracing::warn!(
                    student_id = record.student_id().unwrap_or(""),
                    supplied,
                    derived = %record.grade,
                    "supplied grade disagrees with marks, using derived grade"
                );
            }
        }

        record
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordWireOut<'a> {
    student_id: &'a str,
    name: &'a str,
    mark1: f64,
    mark2: f64,
    mark3: f64,
    mark4: f64,
    mark5: f64,
    total: f64,
    average: i64,
    grade: Grade,
}

impl Serialize for StudentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let [mark1, mark2, mark3, mark4, mark5] = self.marks;
        RecordWireOut {
            student_id: self.student_id().unwrap_or(""),
            name: &self.name,
            mark1,
            mark2,
            mark3,
            mark4,
            mark5,
            total: self.total,
            average: self.average,
            grade: self.grade,
        }
        .serialize(serializer)
    }
}
