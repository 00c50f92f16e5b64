//! Rollup statistics over a set of records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Grade, StudentRecord};

/// Shown in place of a top grade when there are no records.
pub const NO_GRADE: &str = "-";

/// How the "top grade" statistic is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopGradeRule {
    /// String maximum over the letters, starting from `F`.
    ///
    /// `F` is the largest letter, so any non-empty roster reports `F`. This
    /// is what the dashboard has always shown and stays the default.
    #[default]
    Lexicographic,
    /// Best grade actually present.
    Academic,
}

impl FromStr for TopGradeRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lexicographic" => Ok(TopGradeRule::Lexicographic),
            "academic" => Ok(TopGradeRule::Academic),
            other => Err(format!("unknown top grade rule: {other}")),
        }
    }
}

/// Aggregate statistics for a sequence of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rollup {
    pub count: usize,
    /// Rounded mean of the per-record averages; 0 when empty.
    pub mean_average: i64,
    /// `None` when there are no records.
    pub top_grade: Option<Grade>,
    /// Grades present and how often. Absent grades are omitted.
    pub distribution: BTreeMap<Grade, usize>,
}

impl Rollup {
    /// Top grade for display, [`NO_GRADE`] when empty.
    pub fn top_grade_label(&self) -> &'static str {
        self.top_grade.map_or(NO_GRADE, Grade::as_str)
    }

    /// `"A: 2, B: 1"`, or [`NO_GRADE`] when empty.
    pub fn distribution_summary(&self) -> String {
        if self.distribution.is_empty() {
            return NO_GRADE.to_string();
        }
        self.distribution
            .iter()
            .map(|(grade, count)| format!("{grade}: {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One bar per grade, `A` through `F`, zero-filled.
    pub fn chart_series(&self) -> [ChartBar; 5] {
        Grade::ALL.map(|grade| ChartBar {
            grade,
            count: self.distribution.get(&grade).copied().unwrap_or(0),
        })
    }
}

impl fmt::Display for Rollup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "students: {}, average: {}, top grade: {}, distribution: {}",
            self.count,
            self.mean_average,
            self.top_grade_label(),
            self.distribution_summary()
        )
    }
}

/// A single bar of the grade chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBar {
    pub grade: Grade,
    pub count: usize,
}

/// Compute the rollup for `records`.
pub fn compute_rollup(records: &[StudentRecord], rule: TopGradeRule) -> Rollup {
    let count = records.len();
    if count == 0 {
        return Rollup {
            count: 0,
            mean_average: 0,
            top_grade: None,
            distribution: BTreeMap::new(),
        };
    }

    let sum: i64 = records.iter().map(|r| r.average()).sum();
    let mean_average = (sum as f64 / count as f64).round() as i64;

    let mut distribution = BTreeMap::new();
    for r in records {
        *distribution.entry(r.grade()).or_insert(0) += 1;
    }

    let top_grade = match rule {
        TopGradeRule::Lexicographic => records
            .iter()
            .map(|r| r.grade())
            .fold(Grade::F, |a, b| if a < b { b } else { a }),
        // BTreeMap keys are ascending, and A is the best grade.
        TopGradeRule::Academic => *distribution.keys().next().unwrap_or(&Grade::F),
    };

    Rollup {
        count,
        mean_average,
        top_grade: Some(top_grade),
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::derive_record;

    fn with_average(avg: f64) -> StudentRecord {
        derive_record("Some One", [avg; 5]).unwrap()
    }

    #[test]
    fn empty_rollup() {
        let rollup = compute_rollup(&[], TopGradeRule::default());
        assert_eq!(rollup.count, 0);
        assert_eq!(rollup.mean_average, 0);
        assert_eq!(rollup.top_grade, None);
        assert_eq!(rollup.top_grade_label(), "-");
        assert!(rollup.distribution.is_empty());
        assert_eq!(rollup.distribution_summary(), "-");
        assert!(rollup.chart_series().iter().all(|bar| bar.count == 0));
    }

    #[test]
    fn distribution_omits_absent_grades() {
        let records = [with_average(95.0), with_average(91.0), with_average(80.0)];
        let rollup = compute_rollup(&records, TopGradeRule::default());
        assert_eq!(rollup.count, 3);
        assert_eq!(rollup.distribution.len(), 2);
        assert_eq!(rollup.distribution[&Grade::A], 2);
        assert_eq!(rollup.distribution[&Grade::B], 1);
        assert_eq!(rollup.distribution_summary(), "A: 2, B: 1");
    }

    #[test]
    fn chart_series_is_zero_filled_in_order() {
        let records = [with_average(95.0), with_average(10.0), with_average(95.0)];
        let series = compute_rollup(&records, TopGradeRule::default()).chart_series();
        let counts: Vec<(Grade, usize)> = series.iter().map(|b| (b.grade, b.count)).collect();
        assert_eq!(
            counts,
            [
                (Grade::A, 2),
                (Grade::B, 0),
                (Grade::C, 0),
                (Grade::D, 0),
                (Grade::F, 1)
            ]
        );
    }

    #[test]
    fn mean_average_rounds() {
        // averages 90 and 75 -> 82.5 -> 83
        let records = [with_average(90.0), with_average(75.0)];
        assert_eq!(compute_rollup(&records, TopGradeRule::default()).mean_average, 83);

        // averages 90, 90, 89 -> 89.67 -> 90
        let records = [with_average(90.0), with_average(90.0), with_average(89.0)];
        assert_eq!(compute_rollup(&records, TopGradeRule::default()).mean_average, 90);
    }

    #[test]
    fn lexicographic_top_grade_reproduces_string_max() {
        let records = [with_average(95.0), with_average(95.0), with_average(80.0)];
        let rollup = compute_rollup(&records, TopGradeRule::Lexicographic);
        assert_eq!(rollup.top_grade, Some(Grade::F));
    }

    #[test]
    fn academic_top_grade_is_best_present() {
        let records = [with_average(80.0), with_average(95.0), with_average(10.0)];
        let rollup = compute_rollup(&records, TopGradeRule::Academic);
        assert_eq!(rollup.top_grade, Some(Grade::A));

        let records = [with_average(65.0), with_average(45.0)];
        let rollup = compute_rollup(&records, TopGradeRule::Academic);
        assert_eq!(rollup.top_grade, Some(Grade::C));
    }

    #[test]
    fn display_summarizes() {
        let records = [with_average(95.0)];
        let rollup = compute_rollup(&records, TopGradeRule::Academic);
        assert_eq!(
            rollup.to_string(),
            "students: 1, average: 95, top grade: A, distribution: A: 1"
        );
    }

    #[test]
    fn rule_parsing() {
        assert_eq!("Academic".parse::<TopGradeRule>().unwrap(), TopGradeRule::Academic);
        assert!("best".parse::<TopGradeRule>().is_err());
    }
}
