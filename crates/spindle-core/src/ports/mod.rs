//! Ports - 抽象化レイヤー
//!
//! Each trait is a seam where the embedding application can swap in its own
//! implementation (storage, time, id allocation, the actual work).

pub mod clock;
pub mod id_generator;
pub mod processor;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::processor::{DeadlineToken, ProcessError, Processor};
pub use self::task_store::{StatusCounts, TaskStore};
