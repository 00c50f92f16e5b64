//! The `gradebook import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradebook_core::session::{Action, ActionOutcome};

use super::open_session;

pub async fn execute(config_path: Option<PathBuf>, file: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Error importing CSV file {}", file.display()))?;
    let (mut session, _) = open_session(config_path).await?;

    let ActionOutcome::Imported(summary) = session.dispatch(Action::Import(text)).await? else {
        anyhow::bail!("import produced no summary");
    };

    for rejection in &summary.rejected {
        eprintln!("  skipped line {}: {}", rejection.line, rejection.reason);
    }
    if summary.failed > 0 {
        eprintln!("  {} rows were refused by the service", summary.failed);
    }
    println!(
        "{} of {} rows imported",
        summary.imported, summary.rows_found
    );
    Ok(())
}
