//! TaskStore port - the task registry (source of truth for task state).
//!
//! Callers only ever see records through `insert` / `get` / `update` /
//! `list`. Every method returns owned clones, never references into the
//! underlying table.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{TaskId, TaskRecord, TaskStatus};
use crate::error::SpindleError;

/// Number of records per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub done: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Processing => self.processing += 1,
            TaskStatus::Done => self.done += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.processing + self.done + self.failed
    }
}

/// Concurrency-safe keyed store of task records.
///
/// Implementations must allow any number of concurrent callers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Allocate a fresh id and store a new `Pending` record.
    async fn insert(&self, payload: String) -> TaskRecord;

    /// Point lookup.
    async fn get(&self, id: TaskId) -> Result<TaskRecord, SpindleError>;

    /// Replace the stored record for `record.id` wholesale and refresh
    /// `updated_at`. Returns the stored version.
    ///
    /// Fails with `InvalidTransition` unless `record.status` is strictly
    /// later than the stored status; the stored record is left untouched.
    async fn update(&self, record: TaskRecord) -> Result<TaskRecord, SpindleError>;

    /// Point-in-time snapshot of every record, in no particular order.
    async fn list(&self) -> Vec<TaskRecord>;

    async fn counts(&self) -> StatusCounts;
}
