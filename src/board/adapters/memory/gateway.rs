//! In-memory remote gateway acting as the task server.
//!
//! Holds a flat task table and assigns identifiers monotonically, the way
//! the real store does. The server keeps no column ordering: a fetch
//! returns tasks in insertion order, which is exactly the property the
//! persisted cache exists to compensate for.

use crate::board::domain::{
    BoardId, CreateTaskRequest, Task, TaskData, TaskId, TaskPatch, TaskStatus,
};
use crate::board::ports::{GatewayError, GatewayResult, RemoteGateway};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory task server.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<GatewayState>>,
}

#[derive(Debug, Default)]
struct GatewayState {
    tasks: Vec<Task>,
    next_id: u64,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the server with existing tasks, advancing the identifier
    /// counter past the largest seeded id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Rejected`] when a seeded identifier is
    /// already present.
    pub fn seed_tasks(&self, tasks: impl IntoIterator<Item = Task>) -> GatewayResult<()> {
        let mut state = lock_write(&self.state)?;
        for task in tasks {
            if state.tasks.iter().any(|existing| existing.id() == task.id()) {
                return Err(GatewayError::Rejected(format!(
                    "duplicate seeded task id {}",
                    task.id()
                )));
            }
            state.next_id = state.next_id.max(task.id().value());
            state.tasks.push(task);
        }
        Ok(())
    }
}

fn lock_write(
    state: &RwLock<GatewayState>,
) -> GatewayResult<std::sync::RwLockWriteGuard<'_, GatewayState>> {
    state
        .write()
        .map_err(|err| GatewayError::transport(std::io::Error::other(err.to_string())))
}

fn lock_read(
    state: &RwLock<GatewayState>,
) -> GatewayResult<std::sync::RwLockReadGuard<'_, GatewayState>> {
    state
        .read()
        .map_err(|err| GatewayError::transport(std::io::Error::other(err.to_string())))
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn fetch_board_tasks(&self, board_id: BoardId) -> GatewayResult<Vec<Task>> {
        let state = lock_read(&self.state)?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.board_id() == board_id)
            .cloned()
            .collect())
    }

    async fn update_task_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<()> {
        let mut state = lock_write(&self.state)?;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(GatewayError::NotFound(task_id))?;
        task.set_status(status);
        Ok(())
    }

    async fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> GatewayResult<Task> {
        let mut state = lock_write(&self.state)?;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(GatewayError::NotFound(task_id))?;
        task.apply_fields(&patch);
        if let Some(status) = patch.status() {
            task.set_status(status);
        }
        Ok(task.clone())
    }

    async fn create_task(&self, request: CreateTaskRequest) -> GatewayResult<Task> {
        let mut state = lock_write(&self.state)?;
        state.next_id += 1;
        let task = Task::from_remote(TaskData {
            id: TaskId::new(state.next_id),
            board_id: request.board_id(),
            title: request.title().clone(),
            description: request.description().clone(),
            priority: request.priority(),
            status: request.status().unwrap_or(TaskStatus::Backlog),
            assignee: request.assignee().clone(),
        });
        state.tasks.push(task.clone());
        Ok(task)
    }
}
