//! DispatchQueue - submitter と worker の間の bounded FIFO
//!
//! Built on a tokio `mpsc` channel:
//! - `push` waits while the buffer is full (backpressure).
//! - `pop` is shared by all workers through a mutex around the receiver, so
//!   every record is handed to exactly one worker.
//! - `close` drops the pool's sender. Records already buffered (or being
//!   pushed right now) still drain; after that `pop` returns `None`.

use std::sync::{Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, mpsc};

use crate::domain::TaskRecord;
use crate::error::SpindleError;

pub struct DispatchQueue {
    tx: Mutex<Option<mpsc::Sender<TaskRecord>>>,
    rx: AsyncMutex<mpsc::Receiver<TaskRecord>>,
}

impl DispatchQueue {
    /// `capacity` is clamped to at least 1.
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx: Mutex::new(Some(tx)),
            rx: AsyncMutex::new(rx),
        }
    }

    /// Enqueue, waiting for room if the buffer is full.
    pub async fn push(&self, record: TaskRecord) -> Result<(), SpindleError> {
        // lock は clone の間だけ。send の await 中は持たない
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SpindleError::QueueClosed)?;

        tx.send(record)
            .await
            .map_err(|_| SpindleError::QueueClosed)
    }

    /// Dequeue the oldest record, waiting while the queue is empty.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn pop(&self) -> Option<TaskRecord> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Stop accepting new records.
    pub fn close(&self) {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}
