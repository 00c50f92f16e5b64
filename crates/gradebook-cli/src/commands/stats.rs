//! The `gradebook stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::model::Grade;

use super::{apply_view_flags, open_session};

const BAR_WIDTH: usize = 40;

pub async fn execute(
    config_path: Option<PathBuf>,
    search: Option<String>,
    grade: Option<Grade>,
) -> Result<()> {
    let (mut session, _) = open_session(config_path).await?;
    apply_view_flags(&mut session, search, grade, None);
    let dashboard = session.dashboard();
    let rollup = &dashboard.rollup;

    let mut table = Table::new();
    table.set_header(vec!["Students", "Average", "Top grade", "Distribution"]);
    table.add_row(vec![
        Cell::new(rollup.count),
        Cell::new(rollup.mean_average),
        Cell::new(rollup.top_grade_label()),
        Cell::new(rollup.distribution_summary()),
    ]);
    println!("{table}");

    let widest = dashboard.chart.iter().map(|bar| bar.count).max().unwrap_or(0);
    println!();
    for bar in &dashboard.chart {
        let width = if widest == 0 {
            0
        } else {
            (bar.count * BAR_WIDTH).div_ceil(widest)
        };
        println!("{}  {:<BAR_WIDTH$}  {}", bar.grade, "#".repeat(width), bar.count);
    }

    Ok(())
}
