//! The `gradebook list` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::model::Grade;
use gradebook_core::view::SortKey;

use super::{apply_view_flags, open_session, roster_table};

pub async fn execute(
    config_path: Option<PathBuf>,
    search: Option<String>,
    grade: Option<Grade>,
    sort: Option<SortKey>,
    json: bool,
) -> Result<()> {
    let (mut session, _) = open_session(config_path).await?;
    apply_view_flags(&mut session, search, grade, sort);

    let view = session.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view.rows)?);
        return Ok(());
    }

    if view.is_empty() {
        if session.store().is_empty() {
            println!("No students yet. Add one with `gradebook add`.");
        } else {
            println!("No students match the current filters.");
        }
        return Ok(());
    }

    println!("{}", roster_table(&view.rows));
    println!(
        "Showing {} of {} students",
        view.len(),
        session.store().len()
    );
    Ok(())
}
