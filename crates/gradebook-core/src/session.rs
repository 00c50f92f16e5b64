//! Roster session: the single actor that reacts to user actions.
//!
//! Mutations go to the service first. The local store is only touched after
//! the service has answered, and always by re-fetching the canonical list, so
//! a failed call never leaves a phantom row behind. Methods take `&mut self`,
//! which serializes actions; there is no cancellation, so an action always
//! runs to completion once started.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::csv_codec::{export_filename, parse_csv, to_csv, RowRejection};
use crate::error::RosterError;
use crate::grade::{derive_record, feedback};
use crate::model::{EntryForm, Grade, StudentRecord};
use crate::statistics::{compute_rollup, ChartBar, Rollup, TopGradeRule};
use crate::store::RecordStore;
use crate::traits::RosterService;
use crate::validate::validate_entry;
use crate::view::{compute_view, RosterView, SortKey, ViewQuery};

/// Session settings.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub top_grade: TopGradeRule,
    pub initial_sort: SortKey,
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Receives notifications as actions complete.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Drops every notification.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _: &Notification) {}
}

/// A logical user action.
#[derive(Debug, Clone)]
pub enum Action {
    Refresh,
    Submit(EntryForm),
    Edit { student_id: String, form: EntryForm },
    Delete(String),
    BulkDelete(Vec<String>),
    Clear,
    Search(String),
    FilterGrade(Option<Grade>),
    Sort(SortKey),
    /// CSV text to import.
    Import(String),
    /// Export the current view, named for this date.
    Export(NaiveDate),
}

/// What a successful action produced.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Refreshed(usize),
    Saved(Submission),
    Updated(Submission),
    Deleted,
    BulkDeleted(BulkDeleteOutcome),
    Cleared,
    /// The view inputs changed; carries the number of rows now shown.
    ViewChanged(usize),
    Imported(ImportSummary),
    Exported(CsvExport),
}

/// A record the service accepted, with its result-card note.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub record: StudentRecord,
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    pub requested: usize,
    pub succeeded: usize,
}

/// What an import did with each row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Non-blank data rows in the file.
    pub rows_found: usize,
    pub imported: usize,
    /// Rows that failed parsing or validation.
    pub rejected: Vec<RowRejection>,
    /// Valid rows the service refused.
    pub failed: usize,
}

/// A CSV blob ready to hand to a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub contents: String,
    pub rows: usize,
}

/// Everything a presentation layer needs to draw the roster screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub view: RosterView,
    pub rollup: Rollup,
    pub chart: [ChartBar; 5],
}

/// Owns the roster and the current view settings for one user.
pub struct RosterSession {
    service: Arc<dyn RosterService>,
    store: RecordStore,
    query: ViewQuery,
    config: SessionConfig,
    notifier: Arc<dyn Notifier>,
}

impl RosterSession {
    pub fn new(service: Arc<dyn RosterService>, config: SessionConfig) -> Self {
        let query = ViewQuery {
            sort_key: config.initial_sort,
            ..ViewQuery::default()
        };
        Self {
            service,
            store: RecordStore::new(),
            query,
            config,
            notifier: Arc::new(NoopNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    // -----------------------------------------------------------------------
    // View inputs
    // -----------------------------------------------------------------------

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
    }

    pub fn set_grade_filter(&mut self, grade: Option<Grade>) {
        self.query.grade_filter = grade;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.query.sort_key = key;
    }

    pub fn view(&self) -> RosterView {
        compute_view(self.store.list(), &self.query)
    }

    /// Rollup over the current view.
    pub fn rollup(&self) -> Rollup {
        compute_rollup(&self.view().rows, self.config.top_grade)
    }

    pub fn dashboard(&self) -> Dashboard {
        let view = self.view();
        let rollup = compute_rollup(&view.rows, self.config.top_grade);
        let chart = rollup.chart_series();
        Dashboard {
            view,
            rollup,
            chart,
        }
    }

    // -----------------------------------------------------------------------
    // Service-backed operations
    // -----------------------------------------------------------------------

    /// Replace the roster with the service's listing. On failure the last
    /// known roster is kept.
    pub async fn refresh(&mut self) -> Result<usize, RosterError> {
        let records = self.service.list().await.map_err(|e| {
            tracing::error!("failed to load students from {}: {e:#}", self.service.name());
            RosterError::persistence("load students", &e)
        })?;
        let count = records.len();
        self.store.replace(records);
        tracing::debug!(count, "roster refreshed");
        Ok(count)
    }

    /// Validate, derive and persist a new student.
    pub async fn submit(&mut self, form: &EntryForm) -> Result<Submission, RosterError> {
        let entry = validate_entry(form)?;
        let record = derive_record(&entry.name, entry.marks)?;

        let created = self.service.create(&record).await.map_err(|e| {
            tracing::error!(name = record.name(), "failed to save student: {e:#}");
            RosterError::persistence("save student", &e)
        })?;
        tracing::info!(
            student_id = created.student_id().unwrap_or(""),
            grade = %created.grade(),
            "student saved"
        );

        self.reconcile().await;
        let note = feedback(created.grade());
        Ok(Submission {
            record: created,
            note,
        })
    }

    /// Replace an existing student's name and marks.
    pub async fn edit(
        &mut self,
        student_id: &str,
        form: &EntryForm,
    ) -> Result<Submission, RosterError> {
        if self.store.get(student_id).is_none() {
            return Err(RosterError::NotFound(student_id.to_string()));
        }
        let entry = validate_entry(form)?;
        let record = derive_record(&entry.name, entry.marks)?;

        let updated = self
            .service
            .update(student_id, &record)
            .await
            .map_err(|e| {
                tracing::error!(student_id, "failed to update student: {e:#}");
                RosterError::persistence("update student", &e)
            })?;
        tracing::info!(student_id, grade = %updated.grade(), "student updated");

        self.reconcile().await;
        let note = feedback(updated.grade());
        Ok(Submission {
            record: updated,
            note,
        })
    }

    pub async fn delete(&mut self, student_id: &str) -> Result<(), RosterError> {
        self.service.delete(student_id).await.map_err(|e| {
            tracing::error!(student_id, "failed to delete student: {e:#}");
            RosterError::persistence("delete student", &e)
        })?;
        tracing::info!(student_id, "student deleted");
        self.reconcile().await;
        Ok(())
    }

    /// Delete each id in turn, awaiting every call before the next.
    ///
    /// A failed call is counted and the remaining ids are still attempted.
    /// The roster is re-fetched afterwards whatever happened.
    pub async fn bulk_delete(&mut self, ids: &[String]) -> Result<BulkDeleteOutcome, RosterError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique: Vec<&str> = Vec::new();
        for id in ids {
            if seen.insert(id) {
                unique.push(id);
            }
        }
        let ids = unique;
        if ids.is_empty() {
            return Err(RosterError::invalid("selection", "no students selected"));
        }

        let requested = ids.len();
        let mut succeeded = 0;
        let mut last_error = None;
        for id in ids {
            match self.service.delete(id).await {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    tracing::error!(student_id = %id, "bulk delete call failed: {e:#}");
                    last_error = Some(e);
                }
            }
        }
        tracing::info!(requested, succeeded, "bulk delete finished");

        self.reconcile().await;

        match (succeeded, last_error) {
            (_, None) => Ok(BulkDeleteOutcome {
                requested,
                succeeded,
            }),
            (0, Some(e)) => Err(RosterError::persistence("delete students", &e)),
            (_, Some(_)) => Err(RosterError::PartialBulkFailure {
                succeeded,
                requested,
            }),
        }
    }

    pub async fn clear(&mut self) -> Result<(), RosterError> {
        self.service.clear().await.map_err(|e| {
            tracing::error!("failed to clear students: {e:#}");
            RosterError::persistence("clear students", &e)
        })?;
        tracing::info!("all students cleared");
        self.reconcile().await;
        Ok(())
    }

    /// Import CSV text through the same path as manual entry.
    ///
    /// Invalid rows are rejected with their line number; valid rows are
    /// created one at a time. A bad row never stops later rows.
    pub async fn import_csv(&mut self, text: &str) -> Result<ImportSummary, RosterError> {
        if text.trim().is_empty() {
            return Err(RosterError::Import("file is empty".into()));
        }

        let parsed = parse_csv(text)?;
        let mut summary = ImportSummary {
            rows_found: parsed.row_count(),
            rejected: parsed.malformed.clone(),
            ..ImportSummary::default()
        };

        for row in &parsed.rows {
            let candidate = match row.to_candidate() {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::warn!(line = row.line, "rejected import row: {e}");
                    summary.rejected.push(RowRejection {
                        line: row.line,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.service.create(&candidate).await {
                Ok(_) => summary.imported += 1,
                Err(e) => {
                    tracing::error!(line = row.line, "failed to save imported row: {e:#}");
                    summary.failed += 1;
                }
            }
        }
        tracing::info!(
            rows = summary.rows_found,
            imported = summary.imported,
            rejected = summary.rejected.len(),
            failed = summary.failed,
            "import finished"
        );

        self.reconcile().await;
        Ok(summary)
    }

    /// CSV of the current view.
    pub fn export_csv(&self, date: NaiveDate) -> CsvExport {
        let view = self.view();
        CsvExport {
            filename: export_filename(date),
            contents: to_csv(&view.rows),
            rows: view.len(),
        }
    }

    async fn reconcile(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("roster may be stale: {e}");
            self.notifier.notify(&Notification::new(
                NotificationLevel::Error,
                "Failed to load students",
            ));
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Run an action and report its outcome to the notifier.
    pub async fn dispatch(&mut self, action: Action) -> Result<ActionOutcome, RosterError> {
        let result = match action {
            Action::Refresh => self.refresh().await.map(ActionOutcome::Refreshed),
            Action::Submit(form) => self.submit(&form).await.map(ActionOutcome::Saved),
            Action::Edit { student_id, form } => {
                self.edit(&student_id, &form).await.map(ActionOutcome::Updated)
            }
            Action::Delete(id) => self.delete(&id).await.map(|()| ActionOutcome::Deleted),
            Action::BulkDelete(ids) => self
                .bulk_delete(&ids)
                .await
                .map(ActionOutcome::BulkDeleted),
            Action::Clear => self.clear().await.map(|()| ActionOutcome::Cleared),
            Action::Search(term) => {
                self.set_search(term);
                Ok(ActionOutcome::ViewChanged(self.view().len()))
            }
            Action::FilterGrade(grade) => {
                self.set_grade_filter(grade);
                Ok(ActionOutcome::ViewChanged(self.view().len()))
            }
            Action::Sort(key) => {
                self.set_sort_key(key);
                Ok(ActionOutcome::ViewChanged(self.view().len()))
            }
            Action::Import(text) => self.import_csv(&text).await.map(ActionOutcome::Imported),
            Action::Export(date) => Ok(ActionOutcome::Exported(self.export_csv(date))),
        };

        for notification in notifications_for(&result) {
            self.notifier.notify(&notification);
        }
        result
    }
}

fn notifications_for(result: &Result<ActionOutcome, RosterError>) -> Vec<Notification> {
    use NotificationLevel::{Error, Info, Success};

    match result {
        Ok(ActionOutcome::Refreshed(_)) => vec![Notification::new(Success, "Student list refreshed")],
        Ok(ActionOutcome::Saved(_)) => vec![Notification::new(Success, "Student added successfully!")],
        Ok(ActionOutcome::Updated(_)) => {
            vec![Notification::new(Success, "Student updated successfully!")]
        }
        Ok(ActionOutcome::Deleted) => {
            vec![Notification::new(Success, "Student deleted successfully!")]
        }
        Ok(ActionOutcome::BulkDeleted(outcome)) => vec![Notification::new(
            Success,
            format!("Successfully deleted {} students", outcome.succeeded),
        )],
        Ok(ActionOutcome::Cleared) => {
            vec![Notification::new(Success, "All students deleted successfully!")]
        }
        Ok(ActionOutcome::ViewChanged(_)) => vec![],
        Ok(ActionOutcome::Imported(summary)) => {
            let mut notes = vec![Notification::new(
                Success,
                format!("Imported {} students", summary.imported),
            )];
            let skipped = summary.rejected.len() + summary.failed;
            if skipped > 0 {
                notes.push(Notification::new(Info, format!("Skipped {skipped} rows")));
            }
            notes
        }
        Ok(ActionOutcome::Exported(_)) => vec![Notification::new(Success, "CSV exported successfully!")],
        Err(RosterError::InvalidInput { field, .. }) if field == "name" => vec![Notification::new(
            Error,
            "Please enter a valid name (only letters, spaces, hyphens, and apostrophes allowed, minimum 2 characters)",
        )],
        Err(RosterError::InvalidInput { field, .. }) if field.starts_with("mark") => {
            vec![Notification::new(
                Error,
                "Please enter valid marks between 0 and 100 for all subjects",
            )]
        }
        Err(RosterError::InvalidInput { field, .. }) if field == "selection" => {
            vec![Notification::new(Error, "Please select students to delete")]
        }
        Err(e) => vec![Notification::new(Error, e.to_string())],
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// In-test service: ids are `S1`, `S2`, ... and chosen calls can fail.
    #[derive(Default)]
    struct FakeService {
        records: Mutex<Vec<StudentRecord>>,
        next_id: Mutex<u32>,
        failing_deletes: Mutex<HashSet<String>>,
        offline: Mutex<bool>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn seeded(names: &[&str]) -> Arc<Self> {
            let service = Arc::new(Self::default());
            for name in names {
                let record = derive_record(name, [70.0; 5]).unwrap();
                let id = service.assign_id();
                service.records.lock().unwrap().push(record.with_id(id));
            }
            service
        }

        fn assign_id(&self) -> String {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("S{}", *next)
        }

        fn fail_delete_of(&self, id: &str) {
            self.failing_deletes.lock().unwrap().insert(id.to_string());
        }

        fn set_offline(&self, offline: bool) {
            *self.offline.lock().unwrap() = offline;
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn check(&self, call: &str) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(call.to_string());
            if *self.offline.lock().unwrap() {
                anyhow::bail!("connection refused");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RosterService for FakeService {
        fn name(&self) -> &str {
            "fake"
        }

        async fn list(&self) -> anyhow::Result<Vec<StudentRecord>> {
            self.check("list")?;
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, record: &StudentRecord) -> anyhow::Result<StudentRecord> {
            self.check("create")?;
            let created = record.clone().with_id(self.assign_id());
            self.records.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            student_id: &str,
            record: &StudentRecord,
        ) -> anyhow::Result<StudentRecord> {
            self.check("update")?;
            let updated = record.clone().with_id(student_id);
            let mut records = self.records.lock().unwrap();
            for r in records.iter_mut() {
                if r.student_id() == Some(student_id) {
                    *r = updated.clone();
                }
            }
            Ok(updated)
        }

        async fn delete(&self, student_id: &str) -> anyhow::Result<()> {
            self.check(&format!("delete {student_id}"))?;
            if self.failing_deletes.lock().unwrap().contains(student_id) {
                anyhow::bail!("HTTP 500");
            }
            self.records
                .lock()
                .unwrap()
                .retain(|r| r.student_id() != Some(student_id));
            Ok(())
        }

        async fn clear(&self) -> anyhow::Result<()> {
            self.check("clear")?;
            self.records.lock().unwrap().clear();
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Notification>>);

    impl Notifier for Recorder {
        fn notify(&self, notification: &Notification) {
            self.0.lock().unwrap().push(notification.clone());
        }
    }

    impl Recorder {
        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().iter().map(|n| n.message.clone()).collect()
        }
    }

    fn session(service: &Arc<FakeService>) -> RosterSession {
        RosterSession::new(service.clone(), SessionConfig::default())
    }

    fn form(name: &str, mark: &str) -> EntryForm {
        EntryForm::new(name, [mark; 5])
    }

    #[tokio::test]
    async fn submit_persists_then_refetches() {
        let service = FakeService::seeded(&["Anna"]);
        let mut session = session(&service);

        let submission = session.submit(&form("Bob Stone", "90")).await.unwrap();
        assert_eq!(submission.record.student_id(), Some("S2"));
        assert_eq!(submission.record.grade(), Grade::A);
        assert!(submission.note.starts_with("Good job"));

        assert_eq!(service.calls(), ["create", "list"]);
        assert_eq!(session.store().len(), 2);
        assert_eq!(session.store().get("S2").unwrap().name(), "Bob Stone");
    }

    #[tokio::test]
    async fn invalid_input_makes_no_call() {
        let service = FakeService::seeded(&[]);
        let mut session = session(&service);

        let err = session.submit(&form("J0hn", "50")).await.unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput { .. }));
        let err = session.submit(&form("John", "150")).await.unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput { .. }));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_save_leaves_no_phantom_record() {
        let service = FakeService::seeded(&["Anna"]);
        let mut session = session(&service);
        session.refresh().await.unwrap();

        service.set_offline(true);
        let err = session.submit(&form("Bob", "50")).await.unwrap_err();
        assert!(matches!(err, RosterError::PersistenceFailure { .. }));
        assert_eq!(session.store().len(), 1);
        assert!(session.store().pending().next().is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_roster() {
        let service = FakeService::seeded(&["Anna", "Bob"]);
        let mut session = session(&service);
        session.refresh().await.unwrap();

        service.set_offline(true);
        assert!(session.refresh().await.is_err());
        assert_eq!(session.store().len(), 2);
    }

    #[tokio::test]
    async fn bulk_delete_with_failing_second_call() {
        let service = FakeService::seeded(&["Anna", "Bob", "Cara"]);
        service.fail_delete_of("S2");
        let mut session = session(&service);
        session.refresh().await.unwrap();

        let ids = vec!["S1".to_string(), "S2".to_string(), "S3".to_string()];
        let err = session.bulk_delete(&ids).await.unwrap_err();
        assert!(matches!(
            err,
            RosterError::PartialBulkFailure {
                succeeded: 2,
                requested: 3
            }
        ));

        assert_eq!(
            service.calls(),
            ["list", "delete S1", "delete S2", "delete S3", "list"]
        );
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().list()[0].student_id(), Some("S2"));
    }

    #[tokio::test]
    async fn bulk_delete_all_succeed() {
        let service = FakeService::seeded(&["Anna", "Bob"]);
        let mut session = session(&service);
        let ids = vec!["S1".to_string(), "S2".to_string(), "S1".to_string()];
        let outcome = session.bulk_delete(&ids).await.unwrap();
        assert_eq!(
            outcome,
            BulkDeleteOutcome {
                requested: 2,
                succeeded: 2
            }
        );
        assert!(session.store().is_empty());
    }

    #[tokio::test]
    async fn bulk_delete_needs_a_selection() {
        let service = FakeService::seeded(&["Anna"]);
        let mut session = session(&service);
        assert!(session.bulk_delete(&[]).await.is_err());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn bulk_delete_with_every_call_failing() {
        let service = FakeService::seeded(&["Anna"]);
        service.fail_delete_of("S1");
        let mut session = session(&service);
        let err = session.bulk_delete(&["S1".to_string()]).await.unwrap_err();
        assert!(matches!(err, RosterError::PersistenceFailure { .. }));
        assert_eq!(session.store().len(), 1);
    }

    #[tokio::test]
    async fn edit_replaces_marks_and_keeps_id() {
        let service = FakeService::seeded(&["Anna"]);
        let mut session = session(&service);
        session.refresh().await.unwrap();

        let submission = session.edit("S1", &form("Anna Lee", "30")).await.unwrap();
        assert_eq!(submission.record.grade(), Grade::F);
        assert!(submission.note.contains("remedial"));
        let stored = session.store().get("S1").unwrap();
        assert_eq!(stored.name(), "Anna Lee");
        assert_eq!(stored.total(), 150.0);

        let err = session.edit("S9", &form("Anna", "30")).await.unwrap_err();
        assert!(matches!(err, RosterError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let service = FakeService::seeded(&["Anna", "Bob", "Cara"]);
        let mut session = session(&service);
        session.delete("S2").await.unwrap();
        assert_eq!(session.view().ids(), ["S1", "S3"]);

        // Unknown ids are the service's business; the call still succeeds here.
        session.delete("S42").await.unwrap();
        session.clear().await.unwrap();
        assert!(session.store().is_empty());
    }

    #[tokio::test]
    async fn import_creates_valid_rows_and_reports_bad_ones() {
        let service = FakeService::seeded(&[]);
        let mut session = session(&service);
        let text = "Student ID,Name,Mark 1,Mark 2,Mark 3,Mark 4,Mark 5,Total,Average,Grade\n\
                    X1,\"Anna\",90,90,90,90,90,1,1,F\n\
                    X2,\"B0b\",50,50,50,50,50,250,50,D\n\
                    \n\
                    X3,\"Cara\",40,40,40,40,40,200,40,D\n";

        let summary = session.import_csv(text).await.unwrap();
        assert_eq!(summary.rows_found, 3);
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].line, 3);
        assert_eq!(summary.failed, 0);

        // Ids come from the service and grades are recomputed.
        let anna = session.store().get("S1").unwrap();
        assert_eq!(anna.name(), "Anna");
        assert_eq!(anna.grade(), Grade::A);
        assert_eq!(session.store().len(), 2);
    }

    #[tokio::test]
    async fn import_of_empty_file_fails_once() {
        let service = FakeService::seeded(&[]);
        let mut session = session(&service);
        assert!(matches!(
            session.import_csv("  \n").await,
            Err(RosterError::Import(_))
        ));
    }

    #[tokio::test]
    async fn rollup_follows_the_view() {
        let service = FakeService::seeded(&[]);
        let mut session = session(&service);
        session.submit(&form("Anna", "95")).await.unwrap();
        session.submit(&form("Bob", "80")).await.unwrap();
        session.submit(&form("Cara", "20")).await.unwrap();

        let rollup = session.rollup();
        assert_eq!(rollup.count, 3);
        assert_eq!(rollup.mean_average, 65);

        session.set_grade_filter(Some(Grade::A));
        let dashboard = session.dashboard();
        assert_eq!(dashboard.view.len(), 1);
        assert_eq!(dashboard.rollup.count, 1);
        assert_eq!(dashboard.chart[0].count, 1);
        assert_eq!(dashboard.chart[4].count, 0);
    }

    #[tokio::test]
    async fn export_uses_current_view() {
        let service = FakeService::seeded(&["Anna", "Bob"]);
        let mut session = session(&service);
        session.refresh().await.unwrap();
        session.set_search("bob");

        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let export = session.export_csv(date);
        assert_eq!(export.filename, "students_2025-01-31.csv");
        assert_eq!(export.rows, 1);
        assert!(export.contents.contains("\"Bob\""));
        assert!(!export.contents.contains("\"Anna\""));
    }

    #[tokio::test]
    async fn dispatch_notifies() {
        let service = FakeService::seeded(&["Anna"]);
        let recorder = Arc::new(Recorder::default());
        let mut session = session(&service).with_notifier(recorder.clone());

        session.dispatch(Action::Refresh).await.unwrap();
        session.dispatch(Action::Submit(form("Bob", "80"))).await.unwrap();
        session
            .dispatch(Action::Submit(form("X", "50")))
            .await
            .unwrap_err();
        session
            .dispatch(Action::Submit(form("Bob", "500")))
            .await
            .unwrap_err();
        let outcome = session
            .dispatch(Action::Sort(SortKey::Name))
            .await
            .unwrap();
        assert!(matches!(outcome, ActionOutcome::ViewChanged(2)));
        session.dispatch(Action::BulkDelete(vec![])).await.unwrap_err();

        assert_eq!(
            recorder.messages(),
            [
                "Student list refreshed",
                "Student added successfully!",
                "Please enter a valid name (only letters, spaces, hyphens, and apostrophes allowed, minimum 2 characters)",
                "Please enter valid marks between 0 and 100 for all subjects",
                "Please select students to delete",
            ]
        );
    }

    #[tokio::test]
    async fn initial_sort_comes_from_config() {
        let service = FakeService::seeded(&["Cara", "Anna"]);
        let config = SessionConfig {
            initial_sort: SortKey::Name,
            ..SessionConfig::default()
        };
        let mut session = RosterSession::new(service.clone(), config);
        session.refresh().await.unwrap();
        let names: Vec<String> = session
            .view()
            .rows
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, ["Anna", "Cara"]);
    }
}
