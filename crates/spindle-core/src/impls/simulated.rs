//! SimulatedProcessor - デフォルトの Processor
//!
//! Pretends to work for a fixed duration. Payload `"fail"` always fails,
//! everything else succeeds unless the deadline fires first.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::domain::TaskRecord;
use crate::ports::{DeadlineToken, ProcessError, Processor};

/// Payload that makes the simulated processor fail.
pub const FAIL_PAYLOAD: &str = "fail";

pub const DEFAULT_WORK_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    work: Duration,
}

impl SimulatedProcessor {
    pub fn new() -> Self {
        Self::with_work_duration(DEFAULT_WORK_DURATION)
    }

    pub fn with_work_duration(work: Duration) -> Self {
        Self { work }
    }
}

impl Default for SimulatedProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Processor for SimulatedProcessor {
    async fn process(&self, task: &TaskRecord, signal: &DeadlineToken) -> Result<(), ProcessError> {
        info!(task_id = %task.id, payload = %task.payload, "processor working");

        if task.payload == FAIL_PAYLOAD {
            return Err(ProcessError::failed("Payload 'fail' always fail"));
        }

        tokio::select! {
            _ = tokio::time::sleep(self.work) => Ok(()),
            _ = signal.cancelled() => Err(ProcessError::DeadlineExceeded),
        }
    }
}
