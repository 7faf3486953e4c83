//! Domain model (IDs, task records, status).

pub mod ids;
pub mod task;

pub use ids::{ParseIdError, TaskId};
pub use task::{TaskRecord, TaskStatus};
