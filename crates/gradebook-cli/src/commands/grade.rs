//! The `gradebook grade` command: derive a record locally, no service call.

use anyhow::Result;

use gradebook_core::grade::{derive_record, feedback};
use gradebook_core::validate::validate_entry;

use super::{entry_form, print_result_card};

pub fn execute(name: String, marks: Vec<String>) -> Result<()> {
    let form = entry_form(&name, &marks)?;
    let entry = validate_entry(&form)?;
    let record = derive_record(&entry.name, entry.marks)?;
    print_result_card(&record, feedback(record.grade()));
    Ok(())
}
