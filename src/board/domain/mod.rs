//! Domain model for the board reconciliation engine.
//!
//! The board domain models tasks, their column-partitioned ordering on a
//! board, and the validated mutations the reconciler applies to them. All
//! infrastructure concerns stay outside of the domain boundary; every
//! operation here is synchronous and pure.

mod board_state;
mod error;
mod ids;
mod task;

pub use board_state::BoardState;
pub use error::{BoardDomainError, ParseTaskPriorityError, ParseTaskStatusError};
pub use ids::{BoardId, TaskDescription, TaskId, TaskTitle, UserId};
pub use task::{Assignee, CreateTaskRequest, Task, TaskData, TaskPatch, TaskPriority, TaskStatus};
