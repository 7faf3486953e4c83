//! WorkerLoop - タスク実行ループ
//!
//! # フロー
//! 1. DispatchQueue::pop() で record を取得（closed + drained なら終了）
//! 2. Processing にして TaskStore::update() で commit
//! 3. DeadlineToken を作って Processor を実行（timeout 付き）
//! 4. Done / Failed にして TaskStore::update() で commit
//!
//! A failing task never stops the loop. The processor runs in its own tokio
//! task so that even a panic only fails that one record.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::dispatch::DispatchQueue;
use crate::domain::{TaskRecord, TaskStatus};
use crate::error::SpindleError;
use crate::ports::{DeadlineToken, ProcessError, Processor, TaskStore};

/// Everything one worker needs; cheap to clone per worker.
#[derive(Clone)]
pub struct WorkerLoop {
    worker_id: usize,
    queue: Arc<DispatchQueue>,
    store: Arc<dyn TaskStore>,
    processor: Arc<dyn Processor>,
    task_timeout: Duration,
}

impl WorkerLoop {
    pub fn new(
        worker_id: usize,
        queue: Arc<DispatchQueue>,
        store: Arc<dyn TaskStore>,
        processor: Arc<dyn Processor>,
        task_timeout: Duration,
    ) -> Self {
        Self {
            worker_id,
            queue,
            store,
            processor,
            task_timeout,
        }
    }

    /// Drain the queue until it is closed and empty.
    pub async fn run(self) {
        debug!(worker_id = self.worker_id, "worker started");
        while let Some(record) = self.queue.pop().await {
            self.run_one(record).await;
        }
        debug!(worker_id = self.worker_id, "worker exiting");
    }

    /// Process a single record end to end. Returns the final snapshot.
    ///
    /// Records that are not `Pending`, or that the registry refuses to move
    /// to `Processing`, are logged and returned unchanged without running.
    pub async fn run_one(&self, record: TaskRecord) -> TaskRecord {
        let worker_id = self.worker_id;
        let task_id = record.id;

        // 同じ record の二重 submit など。processor は呼ばない
        if record.status != TaskStatus::Pending {
            error!(
                worker_id,
                %task_id,
                status = %record.status,
                "skipping task that is not pending"
            );
            return record;
        }
        info!(worker_id, %task_id, "processing task");

        // registry の正本ではなく private snapshot を更新して commit する
        let mut snapshot = record.clone();
        snapshot.mark_processing();
        if self.commit(&mut snapshot).await.is_err() {
            return record;
        }

        match self.execute(&snapshot).await {
            Ok(()) => snapshot.mark_done(),
            Err(err) => snapshot.mark_failed(err.to_string()),
        }
        // 失敗しても commit() がログを残す。loop は止めない
        let _ = self.commit(&mut snapshot).await;

        match snapshot.status {
            TaskStatus::Failed => warn!(
                worker_id,
                %task_id,
                status = %snapshot.status,
                error = snapshot.error.as_deref().unwrap_or_default(),
                "finished task"
            ),
            _ => info!(worker_id, %task_id, status = %snapshot.status, "finished task"),
        }
        snapshot
    }

    async fn commit(&self, snapshot: &mut TaskRecord) -> Result<(), SpindleError> {
        match self.store.update(snapshot.clone()).await {
            Ok(stored) => {
                *snapshot = stored;
                Ok(())
            }
            // 未登録 or 逆行 = 不変条件違反
            Err(err) => {
                error!(
                    worker_id = self.worker_id,
                    task_id = %snapshot.id,
                    status = %snapshot.status,
                    "registry rejected update: {err}"
                );
                Err(err)
            }
        }
    }

    async fn execute(&self, task: &TaskRecord) -> Result<(), ProcessError> {
        let signal = DeadlineToken::new(self.task_timeout);

        let processor = Arc::clone(&self.processor);
        let owned = task.clone();
        let token = signal.clone();
        let mut call = tokio::spawn(async move { processor.process(&owned, &token).await });

        let result = match tokio::time::timeout(signal.remaining(), &mut call).await {
            Ok(joined) => joined,
            Err(_elapsed) => {
                signal.cancel();
                debug!(
                    worker_id = self.worker_id,
                    task_id = %task.id,
                    "deadline reached, cancelling"
                );
                // 強制終了はしない。processor が cancel を見て戻るのを待つ
                match call.await {
                    Ok(Ok(())) => Ok(Err(ProcessError::DeadlineExceeded)),
                    other => other,
                }
            }
        };

        match result {
            Ok(outcome) => outcome,
            Err(join_err) => {
                error!(
                    worker_id = self.worker_id,
                    task_id = %task.id,
                    "processor aborted: {join_err}"
                );
                Err(ProcessError::failed(format!("processor aborted: {join_err}")))
            }
        }
    }
}
