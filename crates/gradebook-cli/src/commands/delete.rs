//! The `gradebook delete` and `gradebook bulk-delete` commands.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::session::Action;

use super::open_session;

pub async fn execute(config_path: Option<PathBuf>, student_id: String) -> Result<()> {
    let (mut session, _) = open_session(config_path).await?;
    session.dispatch(Action::Delete(student_id)).await?;
    println!("{} students remaining", session.store().len());
    Ok(())
}

pub async fn execute_bulk(config_path: Option<PathBuf>, ids: Vec<String>) -> Result<()> {
    let (mut session, _) = open_session(config_path).await?;
    let result = session.dispatch(Action::BulkDelete(ids)).await;
    println!("{} students remaining", session.store().len());
    result?;
    Ok(())
}
