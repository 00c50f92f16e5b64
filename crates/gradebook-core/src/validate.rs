//! Acceptance rules for raw name and mark input.

use crate::error::RosterError;
use crate::model::{EntryForm, MARK_COUNT};

/// Lowest accepted mark.
pub const MIN_MARK: f64 = 0.0;
/// Highest accepted mark.
pub const MAX_MARK: f64 = 100.0;

const MIN_NAME_LEN: usize = 2;

/// Accepts ASCII letters, whitespace, hyphens and apostrophes, at least two
/// characters long once trimmed.
pub fn validate_name(raw: &str) -> bool {
    let name = raw.trim();
    name.chars().count() >= MIN_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
}

/// Parse a mark, returning `None` unless it is a finite number in [0, 100].
pub fn parse_mark(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    mark_in_range(value).then_some(value)
}

pub fn validate_mark(raw: &str) -> bool {
    parse_mark(raw).is_some()
}

/// Checks a value that is already numeric.
pub(crate) fn mark_in_range(value: f64) -> bool {
    value.is_finite() && (MIN_MARK..=MAX_MARK).contains(&value)
}

/// A form whose fields all passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEntry {
    pub name: String,
    pub marks: [f64; MARK_COUNT],
}

/// Validate a whole form, reporting the first failing field in form order.
pub fn validate_entry(form: &EntryForm) -> Result<ValidEntry, RosterError> {
    if !validate_name(&form.name) {
        return Err(RosterError::invalid(
            "name",
            "only letters, spaces, hyphens, and apostrophes allowed, minimum 2 characters",
        ));
    }

    let mut marks = [0.0; MARK_COUNT];
    for (i, raw) in form.marks.iter().enumerate() {
        marks[i] = parse_mark(raw).ok_or_else(|| {
            RosterError::invalid(
                format!("mark{}", i + 1),
                format!("'{}' is not a mark between 0 and 100", raw.trim()),
            )
        })?;
    }

    Ok(ValidEntry {
        name: form.name.trim().to_string(),
        marks,
    })
}
