//! Total, average and letter-grade derivation.

use crate::error::RosterError;
use crate::model::{Grade, StudentRecord, MARK_COUNT};
use crate::validate::{mark_in_range, validate_name};

/// Map a rounded average to its letter grade. Thresholds are inclusive
/// lower bounds.
pub fn derive_grade(average: i64) -> Grade {
    match average {
        a if a >= 90 => Grade::A,
        a if a >= 75 => Grade::B,
        a if a >= 60 => Grade::C,
        a if a >= 40 => Grade::D,
        _ => Grade::F,
    }
}

/// `total / 5`, rounded half away from zero.
pub fn average_of(total: f64) -> i64 {
    (total / MARK_COUNT as f64).round() as i64
}

/// Build a new, id-less record from a name and five marks.
///
/// Callers are expected to have validated already; the checks are repeated
/// here so a malformed record can never be produced.
pub fn derive_record(name: &str, marks: [f64; MARK_COUNT]) -> Result<StudentRecord, RosterError> {
    if !validate_name(name) {
        return Err(RosterError::invalid("name", format!("'{}' is not a valid name", name.trim())));
    }
    if let Some(i) = marks.iter().position(|m| !mark_in_range(*m)) {
        return Err(RosterError::invalid(
            format!("mark{}", i + 1),
            format!("{} is outside 0..=100", marks[i]),
        ));
    }
    Ok(derive_unchecked(name.trim(), marks))
}

/// Derivation without validation, for records the service already holds.
pub(crate) fn derive_unchecked(name: &str, marks: [f64; MARK_COUNT]) -> StudentRecord {
    let total: f64 = marks.iter().sum();
    let average = average_of(total);
    StudentRecord::from_parts(name.to_string(), marks, total, average, derive_grade(average))
}

/// Result-card note for a freshly derived grade.
pub fn feedback(grade: Grade) -> &'static str {
    if grade.is_failing() {
        "Student has failed. Consider remedial actions."
    } else {
        "Good job! Keep improving where needed."
    }
}
