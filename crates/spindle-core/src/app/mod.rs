//! App - アプリケーション層
//!
//! ports を組み合わせて実行系を組み立てる。
//!
//! # 主要コンポーネント
//! - **DispatchQueue**: submitter → worker の bounded FIFO
//! - **WorkerLoop**: タスク実行ループ（pop→processing→process→done/failed）
//! - **WorkerPool**: queue と N 本の WorkerLoop の起動・停止

pub mod dispatch;
pub mod pool;
pub mod worker_loop;

// 主要な型を再エクスポート
pub use self::dispatch::DispatchQueue;
pub use self::pool::{PoolConfig, WorkerPool};
pub use self::worker_loop::WorkerLoop;
