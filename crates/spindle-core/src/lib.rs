//! spindle-core
//!
//! In-process task queue: a shared task registry, a bounded dispatch queue
//! and a fixed pool of workers that run a pluggable `Processor` under a
//! per-task deadline.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskId, TaskRecord, TaskStatus）
//! - **ports**: 抽象化レイヤー（TaskStore, Processor, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryTaskStore, SimulatedProcessor）
//! - **app**: 実行系（DispatchQueue, WorkerLoop, WorkerPool）
//! - **error**: エラー型
//!
//! ```ignore
//! let store = Arc::new(InMemoryTaskStore::new());
//! let processor = Arc::new(SimulatedProcessor::new());
//! let pool = WorkerPool::new(PoolConfig::default(), store.clone(), processor);
//! pool.start()?;
//!
//! let record = store.insert("hello".to_string()).await;
//! pool.submit(record).await?;
//!
//! pool.shutdown().await;
//! ```

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use app::{PoolConfig, WorkerPool};
pub use domain::{TaskId, TaskRecord, TaskStatus};
pub use error::SpindleError;
pub use impls::{InMemoryTaskStore, SimulatedProcessor};
pub use ports::{DeadlineToken, ProcessError, Processor, StatusCounts, TaskStore};
