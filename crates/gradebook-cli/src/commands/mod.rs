pub mod add;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod export;
pub mod grade;
pub mod import;
pub mod init;
pub mod list;
pub mod stats;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use gradebook_client::config::{create_service, load_config_from, GradebookConfig};
use gradebook_core::model::{EntryForm, Grade, StudentRecord, MARK_COUNT};
use gradebook_core::session::{Notification, NotificationLevel, Notifier, RosterSession};
use gradebook_core::view::SortKey;

/// Prints session notifications to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Error => eprintln!("{}", notification.message),
            NotificationLevel::Info | NotificationLevel::Success => {
                println!("{}", notification.message)
            }
        }
    }
}

/// Load config, connect to the service and fetch the roster.
pub async fn open_session(config_path: Option<PathBuf>) -> Result<(RosterSession, GradebookConfig)> {
    let config = load_config_from(config_path.as_deref())?;
    let service = create_service(&config)?;
    let mut session =
        RosterSession::new(service, config.session_config()).with_notifier(Arc::new(ConsoleNotifier));
    session
        .refresh()
        .await
        .with_context(|| format!("Failed to load students from {}", config.api_base))?;
    Ok((session, config))
}

/// Apply the optional view flags shared by several commands.
pub fn apply_view_flags(
    session: &mut RosterSession,
    search: Option<String>,
    grade: Option<Grade>,
    sort: Option<SortKey>,
) {
    if let Some(term) = search {
        session.set_search(term);
    }
    session.set_grade_filter(grade);
    if let Some(key) = sort {
        session.set_sort_key(key);
    }
}

/// Build an entry form from a name and exactly five mark arguments.
pub fn entry_form(name: &str, marks: &[String]) -> Result<EntryForm> {
    let marks: [String; MARK_COUNT] = marks
        .to_vec()
        .try_into()
        .map_err(|m: Vec<String>| anyhow::anyhow!("expected {MARK_COUNT} marks, got {}", m.len()))?;
    Ok(EntryForm {
        name: name.to_string(),
        marks,
    })
}

pub fn roster_table(records: &[StudentRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
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
    ]);

    for r in records {
        let mut row = vec![
            Cell::new(r.student_id().unwrap_or("-")),
            Cell::new(r.name()),
        ];
        row.extend(r.marks().iter().map(Cell::new));
        row.push(Cell::new(r.total()));
        row.push(Cell::new(r.average()));
        row.push(Cell::new(r.grade()));
        table.add_row(row);
    }

    table
}

/// The result card shown after a record is derived.
pub fn print_result_card(record: &StudentRecord, note: &str) {
    if let Some(id) = record.student_id() {
        println!("Student ID: {id}");
    }
    println!("Name:       {}", record.name());
    println!("Total:      {}", record.total());
    println!("Average:    {}", record.average());
    println!("Grade:      {}", record.grade());
    println!("{note}");
}
