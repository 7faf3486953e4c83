//! InMemoryTaskStore - プロセス内のタスクレジストリ
//!
//! One `RwLock` over the whole table: lookups and listings run in parallel,
//! any write excludes everything else. Nothing is ever evicted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{TaskId, TaskRecord};
use crate::error::SpindleError;
use crate::ports::{Clock, IdGenerator, StatusCounts, SystemClock, TaskStore, UlidGenerator};

pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, TaskRecord>>,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Timestamps and ULID time bits both come from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let ids = Box::new(UlidGenerator::new(Arc::clone(&clock)));
        Self::with_parts(clock, ids)
    }

    pub fn with_parts(clock: Arc<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            clock,
            ids,
        }
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, payload: String) -> TaskRecord {
        let mut tasks = self.tasks.write().await;

        // ULID の衝突は現実的には起きないが、一意性はここで保証する
        let mut id = self.ids.generate_task_id();
        while tasks.contains_key(&id) {
            id = self.ids.generate_task_id();
        }

        let record = TaskRecord::new(id, payload, self.clock.now());
        tasks.insert(id, record.clone());
        record
    }

    async fn get(&self, id: TaskId) -> Result<TaskRecord, SpindleError> {
        let tasks = self.tasks.read().await;
        tasks.get(&id).cloned().ok_or(SpindleError::TaskNotFound(id))
    }

    async fn update(&self, mut record: TaskRecord) -> Result<TaskRecord, SpindleError> {
        let mut tasks = self.tasks.write().await;
        let Some(slot) = tasks.get_mut(&record.id) else {
            return Err(SpindleError::TaskNotFound(record.id));
        };
        if !slot.status.can_become(record.status) {
            return Err(SpindleError::InvalidTransition {
                id: record.id,
                from: slot.status,
                to: record.status,
            });
        }

        record.updated_at = self.clock.now().max(record.created_at);
        *slot = record.clone();
        Ok(record)
    }

    async fn list(&self) -> Vec<TaskRecord> {
        let tasks = self.tasks.read().await;
        tasks.values().cloned().collect()
    }

    async fn counts(&self) -> StatusCounts {
        let tasks = self.tasks.read().await;
        let mut counts = StatusCounts::default();
        for record in tasks.values() {
            counts.record(record.status);
        }
        counts
    }
}
