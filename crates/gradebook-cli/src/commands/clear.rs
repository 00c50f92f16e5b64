//! The `gradebook clear` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::session::Action;

use super::open_session;

pub async fn execute(config_path: Option<PathBuf>, yes: bool) -> Result<()> {
    anyhow::ensure!(
        yes,
        "this deletes every student; pass --yes to confirm"
    );

    let (mut session, _) = open_session(config_path).await?;
    let count = session.store().len();
    session.dispatch(Action::Clear).await?;
    tracing::info!(count, "roster cleared");
    Ok(())
}
