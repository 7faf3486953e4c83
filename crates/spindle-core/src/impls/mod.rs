//! Impls - ports の実装
//!
//! - **InMemoryTaskStore**: プロセス内レジストリ
//! - **SimulatedProcessor**: デフォルトの Processor（動作確認・テスト用）

pub mod inmem_store;
pub mod simulated;

pub use self::inmem_store::InMemoryTaskStore;
pub use self::simulated::{FAIL_PAYLOAD, SimulatedProcessor};
