//! Processor port - the execution contract for a single task.
//!
//! The pool calls `Processor::process` once per task with a fresh
//! `DeadlineToken`. When the pool's per-task timeout elapses the token is
//! cancelled; a processor is expected to notice and return
//! `ProcessError::DeadlineExceeded` promptly. The pool never aborts a
//! processor that ignores the token, it just keeps waiting.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::TaskRecord;

/// Why a task did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("task timed out: deadline exceeded")]
    DeadlineExceeded,

    /// Business failure, message is recorded verbatim.
    #[error("{0}")]
    Failed(String),
}

impl ProcessError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Per-invocation cancellation signal bound to a deadline.
///
/// Created by the pool right before `process` and dropped right after.
#[derive(Debug, Clone)]
pub struct DeadlineToken {
    token: CancellationToken,
    deadline: Instant,
}

impl DeadlineToken {
    pub fn new(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the deadline (zero once it passed).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// The pluggable unit of work.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, task: &TaskRecord, signal: &DeadlineToken) -> Result<(), ProcessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_wakes_waiters() {
        let signal = DeadlineToken::new(Duration::from_secs(60));
        assert!(!signal.is_cancelled());

        let waiter = signal.clone();
        let join = tokio::spawn(async move { waiter.cancelled().await });

        signal.cancel();
        join.await.unwrap();
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn remaining_is_bounded_by_timeout() {
        let signal = DeadlineToken::new(Duration::from_millis(500));
        assert!(signal.remaining() <= Duration::from_millis(500));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ProcessError::DeadlineExceeded.to_string(),
            "task timed out: deadline exceeded"
        );
        assert_eq!(
            ProcessError::failed("something went wrong").to_string(),
            "something went wrong"
        );
    }
}
