//! In-memory roster service for tests and offline use.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use gradebook_core::model::StudentRecord;
use gradebook_core::traits::RosterService;

use crate::error::ServiceError;

/// Id used when a name has no initials.
const FALLBACK_ID: &str = "STU001";

#[derive(Default)]
struct State {
    records: Vec<StudentRecord>,
    /// Next sequence number per initials prefix.
    sequences: HashMap<String, u32>,
    failing_ids: HashSet<String>,
    offline: bool,
}

/// A roster service that keeps records in memory.
///
/// Ids follow the server's scheme: uppercase initials of each name part and
/// a three-digit per-initials sequence (`"Anna Lee"` → `AL001`). Failures can
/// be injected per id or for every call.
#[derive(Default)]
pub struct InMemoryRosterService {
    state: Mutex<State>,
    call_count: AtomicU32,
}

impl InMemoryRosterService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service already holding `records`. Ids are assigned to any
    /// record that has none.
    pub fn with_records(records: Vec<StudentRecord>) -> Self {
        let service = Self::new();
        {
            let mut state = service.lock();
            for record in records {
                let record = match record.student_id() {
                    Some(_) => record,
                    None => {
                        let id = next_id(&mut state.sequences, record.name());
                        record.with_id(id)
                    }
                };
                state.records.push(record);
            }
        }
        service
    }

    /// Make every call fail with a network error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Make updates and deletes of `student_id` fail with HTTP 500.
    pub fn fail_on(&self, student_id: &str) {
        self.lock().failing_ids.insert(student_id.to_string());
    }

    /// Number of service calls made so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Stored records, in insertion order.
    pub fn records(&self) -> Vec<StudentRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, State>, ServiceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let state = self.lock();
        if state.offline {
            return Err(ServiceError::Network("in-memory service is offline".into()));
        }
        Ok(state)
    }
}

fn next_id(sequences: &mut HashMap<String, u32>, name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase();
    if initials.is_empty() {
        return FALLBACK_ID.to_string();
    }

    let seq = sequences.entry(initials.clone()).or_insert(0);
    *seq += 1;
    format!("{initials}{:03}", *seq)
}

fn failing(state: &State, student_id: &str) -> Result<(), ServiceError> {
    if state.failing_ids.contains(student_id) {
        return Err(ServiceError::Status {
            status: 500,
            message: format!("injected failure for {student_id}"),
        });
    }
    Ok(())
}

#[async_trait]
impl RosterService for InMemoryRosterService {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> anyhow::Result<Vec<StudentRecord>> {
        let state = self.begin()?;
        Ok(state.records.clone())
    }

    async fn create(&self, record: &StudentRecord) -> anyhow::Result<StudentRecord> {
        let mut state = self.begin()?;
        let id = next_id(&mut state.sequences, record.name());
        let created = record.clone().with_id(id);
        state.records.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        student_id: &str,
        record: &StudentRecord,
    ) -> anyhow::Result<StudentRecord> {
        let mut state = self.begin()?;
        failing(&state, student_id)?;

        let updated = record.clone().with_id(student_id);
        let existing = state
            .records
            .iter()
            .position(|r| r.student_id() == Some(student_id));
        match existing {
            Some(i) => state.records[i] = updated.clone(),
            None => state.records.push(updated.clone()),
        }
        Ok(updated)
    }

    async fn delete(&self, student_id: &str) -> anyhow::Result<()> {
        let mut state = self.begin()?;
        failing(&state, student_id)?;
        state
            .records
            .retain(|r| r.student_id() != Some(student_id));
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let mut state = self.begin()?;
        state.records.clear();
        state.sequences.clear();
        Ok(())
    }
}
