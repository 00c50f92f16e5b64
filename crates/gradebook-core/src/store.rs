//! The canonical roster held in memory.
//!
//! The remote service is the source of truth for ids, so the usual way to
//! reconcile after a mutation is [`RecordStore::replace`] with a fresh
//! listing. [`RecordStore::add`] accepts id-less (pending) records for
//! callers that want to show a row before the round-trip completes; the next
//! `replace` drops them.

use std::collections::HashSet;

use crate::model::StudentRecord;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<StudentRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full roster in insertion order.
    pub fn list(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, student_id: &str) -> Option<&StudentRecord> {
        self.records
            .iter()
            .find(|r| r.student_id() == Some(student_id))
    }

    /// Records still waiting for an id.
    pub fn pending(&self) -> impl Iterator<Item = &StudentRecord> {
        self.records.iter().filter(|r| r.is_pending())
    }

    pub fn add(&mut self, record: StudentRecord) -> &StudentRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Remove every record with this id. Absent ids are ignored.
    pub fn remove(&mut self, student_id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.student_id() != Some(student_id));
        before - self.records.len()
    }

    /// Remove every record whose id is in `ids`, returning how many went.
    pub fn remove_many(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|r| !r.student_id().is_some_and(|id| ids.contains(id)));
        before - self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn replace(&mut self, snapshot: Vec<StudentRecord>) {
        self.records = snapshot;
    }
}
