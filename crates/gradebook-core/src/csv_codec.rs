//! CSV export and import of roster records.
//!
//! Export quotes the name column only. Import is structural: rows come back
//! as raw fields and only turn into records through
//! [`CsvRow::to_candidate`], which applies the same validation and
//! derivation as manual entry.

use chrono::NaiveDate;

use crate::error::RosterError;
use crate::grade::derive_record;
use crate::model::{EntryForm, StudentRecord, MARK_COUNT};
use crate::validate::validate_entry;

/// Export header row.
pub const HEADER: [&str; 10] = [
    "Student ID",
    "Name",
    "Mark 1",
    "Mark 2",
    "Mark 3",
    "Mark 4",
    "Mark 5",
    "Total",
    "Average",
    "Grade",
];

const NAME_COLUMN: usize = 1;
const FIRST_MARK_COLUMN: usize = 2;
/// Fields a data row needs before it can become a record.
const ROW_WIDTH: usize = FIRST_MARK_COLUMN + MARK_COUNT;

/// Serialize records, header first, one newline-terminated line each.
pub fn to_csv(records: &[StudentRecord]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');

    for r in records {
        let mut row = vec![
            r.student_id().unwrap_or("").to_string(),
            format!("\"{}\"", r.name()),
        ];
        row.extend(r.marks().iter().map(|m| m.to_string()));
        row.push(r.total().to_string());
        row.push(r.average().to_string());
        row.push(r.grade().to_string());

        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Download name for an export made on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("students_{}.csv", date.format("%Y-%m-%d"))
}

/// One data line of an imported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the source text.
    pub line: u64,
    pub fields: Vec<String>,
}

impl CsvRow {
    /// Validate and derive a record from this row.
    ///
    /// Id, total, average and grade columns are ignored; the service assigns
    /// the id and the rest is recomputed from the marks.
    pub fn to_candidate(&self) -> Result<StudentRecord, RosterError> {
        if self.fields.len() < ROW_WIDTH {
            return Err(short_row(self.line, self.fields.len()));
        }

        let mut marks: [&str; MARK_COUNT] = [""; MARK_COUNT];
        for (i, mark) in marks.iter_mut().enumerate() {
            *mark = self.fields[FIRST_MARK_COLUMN + i].as_str();
        }
        let form = EntryForm::new(self.fields[NAME_COLUMN].as_str(), marks);

        let entry = validate_entry(&form).map_err(|e| match e {
            RosterError::InvalidInput { field, reason } => RosterError::InvalidInput {
                field,
                reason: format!("line {}: {reason}", self.line),
            },
            other => other,
        })?;
        derive_record(&entry.name, entry.marks)
    }
}

fn short_row(line: u64, found: usize) -> RosterError {
    RosterError::invalid(
        "row",
        format!("line {line}: expected at least {ROW_WIDTH} fields, found {found}"),
    )
}

/// A row that could not be read or turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub line: u64,
    pub reason: String,
}

/// Result of parsing an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvImport {
    /// Rows wide enough to hold a name and five marks.
    pub rows: Vec<CsvRow>,
    /// Non-blank rows with too few fields.
    pub malformed: Vec<RowRejection>,
}

impl CsvImport {
    /// Number of non-blank data rows structurally present.
    pub fn row_count(&self) -> usize {
        self.rows.len() + self.malformed.len()
    }
}

/// Split `text` into data rows.
///
/// The first line is always the header, even when it is blank. Blank data
/// lines are skipped and short rows land in [`CsvImport::malformed`]. Line
/// numbers count from the top of `text`.
pub fn parse_csv(text: &str) -> Result<CsvImport, RosterError> {
    let body = text.split_once('\n').map_or("", |(_, rest)| rest);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut import = CsvImport::default();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line() + 1);
            RosterError::Import(format!("line {line}: {e}"))
        })?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let line = record.position().map_or(0, |p| p.line() + 1);
        if record.len() < ROW_WIDTH {
            let reason = short_row(line, record.len()).to_string();
            tracing::warn!(line, "skipping malformed CSV row: {reason}");
            import.malformed.push(RowRejection { line, reason });
            continue;
        }
        import.rows.push(CsvRow {
            line,
            fields: record.iter().map(|f| f.trim().to_string()).collect(),
        });
    }

    Ok(import)
}
