//! The `gradebook edit` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::session::{Action, ActionOutcome};

use super::{entry_form, open_session, print_result_card};

pub async fn execute(
    config_path: Option<PathBuf>,
    student_id: String,
    name: String,
    marks: Vec<String>,
) -> Result<()> {
    let form = entry_form(&name, &marks)?;
    let (mut session, _) = open_session(config_path).await?;

    let outcome = session.dispatch(Action::Edit { student_id, form }).await?;
    if let ActionOutcome::Updated(submission) = outcome {
        println!();
        print_result_card(&submission.record, submission.note);
    }
    Ok(())
}
