//! WorkerPool - bounded dispatch queue + N worker loops.
//!
//! Lifecycle: `new` -> `start` (once) -> `submit`* -> `shutdown`.
//! `shutdown` closes the queue, lets the workers drain whatever was already
//! submitted and waits for every worker to exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::dispatch::DispatchQueue;
use super::worker_loop::WorkerLoop;
use crate::domain::TaskRecord;
use crate::error::SpindleError;
use crate::ports::{Processor, TaskStore};

pub const DEFAULT_WORKERS: usize = 3;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool sizing and the per-task deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of concurrent worker loops (at least 1).
    pub workers: usize,
    /// Dispatch queue capacity (at least 1).
    pub queue_capacity: usize,
    /// Deadline for a single `Processor::process` call.
    pub task_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }
}

impl PoolConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }
}

pub struct WorkerPool {
    config: PoolConfig,
    queue: Arc<DispatchQueue>,
    store: Arc<dyn TaskStore>,
    processor: Arc<dyn Processor>,
    started: AtomicBool,
    joins: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn new(
        config: PoolConfig,
        store: Arc<dyn TaskStore>,
        processor: Arc<dyn Processor>,
    ) -> Self {
        let config = PoolConfig {
            workers: config.workers.max(1),
            ..config
        };
        let queue = Arc::new(DispatchQueue::bounded(config.queue_capacity));
        Self {
            config,
            queue,
            store,
            processor,
            started: AtomicBool::new(false),
            joins: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Spawn the worker loops. Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<(), SpindleError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(SpindleError::AlreadyStarted);
        }

        let mut joins = self.joins.lock().unwrap_or_else(PoisonError::into_inner);
        for worker_id in 0..self.config.workers {
            let worker = WorkerLoop::new(
                worker_id,
                Arc::clone(&self.queue),
                Arc::clone(&self.store),
                Arc::clone(&self.processor),
                self.config.task_timeout,
            );
            joins.push(tokio::spawn(worker.run()));
        }

        info!(
            workers = self.config.workers,
            queue_capacity = self.config.queue_capacity,
            task_timeout_ms = self.config.task_timeout.as_millis() as u64,
            "worker pool started"
        );
        Ok(())
    }

    /// Hand a record to the workers. Waits while the queue is full.
    ///
    /// Fails with `QueueClosed` once `shutdown` has begun; callers should
    /// stop submitting before they shut the pool down.
    pub async fn submit(&self, record: TaskRecord) -> Result<(), SpindleError> {
        let task_id = record.id;
        self.queue.push(record).await.inspect_err(|err| {
            warn!(%task_id, "submit rejected: {err}");
        })
    }

    /// Stop accepting work, drain the queue and wait for every worker.
    ///
    /// Calling it again is a no-op.
    pub async fn shutdown(&self) {
        info!("shutting down worker pool");
        self.queue.close();

        if !self.started.load(Ordering::SeqCst) {
            warn!("worker pool was never started; queued tasks stay pending");
        }

        let joins = std::mem::take(&mut *self.joins.lock().unwrap_or_else(PoisonError::into_inner));
        for join in joins {
            if let Err(err) = join.await {
                error!("worker terminated abnormally: {err}");
            }
        }
        info!("worker pool stopped");
    }
}
