//! The `gradebook export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradebook_core::model::Grade;
use gradebook_core::session::{Action, ActionOutcome};
use gradebook_core::view::SortKey;

use super::{apply_view_flags, open_session};

pub async fn execute(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    search: Option<String>,
    grade: Option<Grade>,
    sort: Option<SortKey>,
) -> Result<()> {
    let (mut session, config) = open_session(config_path).await?;
    apply_view_flags(&mut session, search, grade, sort);

    let today = chrono::Local::now().date_naive();
    let ActionOutcome::Exported(export) = session.dispatch(Action::Export(today)).await? else {
        anyhow::bail!("export produced no CSV");
    };

    let path = output.unwrap_or_else(|| config.export_dir.join(&export.filename));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, &export.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Wrote {} students to {}", export.rows, path.display());
    Ok(())
}
