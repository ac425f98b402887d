//! Remote gateway port for fetching and mutating tasks on the server.

use crate::board::domain::{BoardId, CreateTaskRequest, Task, TaskId, TaskPatch, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Capability interface onto the remote task store.
///
/// The reconciler consumes this trait only at call sites; implementations
/// carry the transport. There is no cancellation channel: a call either
/// settles or is abandoned to the reconciler's watchdog deadline.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetches every task on the given board, in the server's order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the board cannot be fetched; callers
    /// treat this as fatal to the surrounding operation.
    async fn fetch_board_tasks(&self, board_id: BoardId) -> GatewayResult<Vec<Task>>;

    /// Persists a task's status transition.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for an unknown task, or a
    /// transport/rejection error for a failed update.
    async fn update_task_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<()>;

    /// Applies a field patch to a task and returns the canonical task as
    /// the server now holds it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] for an unknown task, or a
    /// transport/rejection error for a failed update.
    async fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> GatewayResult<Task>;

    /// Creates a task; the server assigns the identifier and defaults the
    /// status to `Backlog` when the request names none.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the task was not created.
    async fn create_task(&self, request: CreateTaskRequest) -> GatewayResult<Task>;
}

/// Errors returned by remote gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The task does not exist on the server.
    #[error("task not found on remote store: {0}")]
    NotFound(TaskId),

    /// The server refused the mutation.
    #[error("remote store rejected the request: {0}")]
    Rejected(String),

    /// Transport-layer failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// No settlement arrived within the reconciler's deadline.
    ///
    /// Raised client-side by the reconciler's watchdog, never by a
    /// transport adapter.
    #[error("request did not settle within the deadline")]
    TimedOut,
}

impl GatewayError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
