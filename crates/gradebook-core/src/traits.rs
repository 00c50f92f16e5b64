//! The remote student-record service seam.
//!
//! Implemented by `gradebook-client` over HTTP and in memory. Implementations
//! report transport and status failures through `anyhow`; the session treats
//! every failure the same way.

use async_trait::async_trait;

use crate::model::StudentRecord;

/// Source of truth for the roster and the only place ids are assigned.
#[async_trait]
pub trait RosterService: Send + Sync {
    /// Human-readable service name (e.g. "http").
    fn name(&self) -> &str;

    /// Every stored record.
    async fn list(&self) -> anyhow::Result<Vec<StudentRecord>>;

    /// Persist a new record. Only the name and marks are sent; the returned
    /// record carries the assigned id.
    async fn create(&self, record: &StudentRecord) -> anyhow::Result<StudentRecord>;

    /// Replace the record stored under `student_id` with `record`'s name and
    /// marks.
    async fn update(&self, student_id: &str, record: &StudentRecord)
        -> anyhow::Result<StudentRecord>;

    async fn delete(&self, student_id: &str) -> anyhow::Result<()>;

    async fn clear(&self) -> anyhow::Result<()>;
}
