//! Task record: payload + lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TaskId;

/// Task status.
///
/// State transitions:
/// - Pending -> Processing -> Done
/// - Pending -> Processing -> Failed
///
/// Terminal states never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Stored, waiting in the dispatch queue.
    Pending,

    /// Claimed by a worker.
    Processing,

    /// Processor returned success.
    Done,

    /// Processor returned an error (including timeout).
    Failed,
}

impl TaskStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }

    /// Can a record stored with `self` be overwritten with `next`?
    ///
    /// Strictly forward only, so a record is claimed for `Processing` once
    /// and nothing follows a terminal state.
    pub fn can_become(self, next: TaskStatus) -> bool {
        next.rank() > self.rank()
    }

    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Processing => 1,
            TaskStatus::Done | TaskStatus::Failed => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work and its current state.
///
/// The registry owns the authoritative copy. Workers mutate a private clone
/// through the `mark_*` methods and commit it back with a full replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub payload: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Set only when `status == Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskRecord {
    pub fn new(id: TaskId, payload: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            payload: payload.into(),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            error: None,
        }
    }

    /// Pending -> Processing.
    pub fn mark_processing(&mut self) {
        debug_assert_eq!(self.status, TaskStatus::Pending);
        self.status = TaskStatus::Processing;
    }

    /// Processing -> Done.
    pub fn mark_done(&mut self) {
        debug_assert_eq!(self.status, TaskStatus::Processing);
        self.status = TaskStatus::Done;
        self.error = None;
    }

    /// Processing -> Failed.
    ///
    /// An empty reason is replaced so that `error` is never blank on a
    /// failed record.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        debug_assert_eq!(self.status, TaskStatus::Processing);
        let mut error = error.into();
        if error.is_empty() {
            error = "unknown error".to_string();
        }
        self.status = TaskStatus::Failed;
        self.error = Some(error);
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn record() -> TaskRecord {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        TaskRecord::new(TaskId::from_ulid(Ulid::new()), "hello", now)
    }

    #[test]
    fn new_record_is_pending() {
        let r = record();
        assert_eq!(r.status, TaskStatus::Pending);
        assert_eq!(r.payload, "hello");
        assert_eq!(r.created_at, r.updated_at);
        assert!(r.error.is_none());
        assert!(!r.is_terminal());
    }

    #[test]
    fn success_path() {
        let mut r = record();
        r.mark_processing();
        assert_eq!(r.status, TaskStatus::Processing);
        r.mark_done();
        assert_eq!(r.status, TaskStatus::Done);
        assert!(r.error.is_none());
        assert!(r.is_terminal());
    }

    #[test]
    fn failure_path_keeps_reason() {
        let mut r = record();
        r.mark_processing();
        r.mark_failed("boom");
        assert_eq!(r.status, TaskStatus::Failed);
        assert_eq!(r.error.as_deref(), Some("boom"));
    }

    #[test]
    fn failure_reason_is_never_blank() {
        let mut r = record();
        r.mark_processing();
        r.mark_failed("");
        assert!(!r.error.unwrap().is_empty());
    }

    #[test]
    fn transitions_only_move_forward() {
        use TaskStatus::*;

        assert!(Pending.can_become(Processing));
        assert!(Processing.can_become(Done));
        assert!(Processing.can_become(Failed));
        assert!(Pending.can_become(Done));

        assert!(!Pending.can_become(Pending));
        assert!(!Processing.can_become(Processing));
        assert!(!Processing.can_become(Pending));
        for terminal in [Done, Failed] {
            for next in [Pending, Processing, Done, Failed] {
                assert!(!terminal.can_become(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn wire_shape() {
        let mut r = record();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["payload"], "hello");
        assert!(json["id"].as_str().unwrap().starts_with("task-"));
        assert!(json.get("error").is_none());

        r.mark_processing();
        r.mark_failed("Payload 'fail' always fail");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "Payload 'fail' always fail");
    }
}
