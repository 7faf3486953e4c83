use thiserror::Error;

use crate::domain::{TaskId, TaskStatus};

#[derive(Debug, Error)]
pub enum SpindleError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// Commit would move a record backwards or out of a terminal state.
    #[error("task {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("dispatch queue is closed")]
    QueueClosed,

    #[error("worker pool already started")]
    AlreadyStarted,
}
