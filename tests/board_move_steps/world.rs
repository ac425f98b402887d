//! Shared world state for board move BDD scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rstest::fixture;
use tessera::board::{
    adapters::memory::{InMemoryGateway, InMemorySnapshotCache},
    domain::{
        Assignee, BoardId, CreateTaskRequest, Task, TaskData, TaskDescription, TaskId, TaskPatch,
        TaskPriority, TaskStatus, TaskTitle, UserId,
    },
    ports::{GatewayError, GatewayResult, RemoteGateway},
    services::{ReconcileError, Reconciler},
};

/// Board every scenario runs against.
pub const BOARD: BoardId = BoardId::new(1);

/// Remote store whose next status update can be made to fail.
pub struct FlakyGateway {
    inner: InMemoryGateway,
    reject_next_status: AtomicBool,
}

impl FlakyGateway {
    /// Creates a gateway with an empty remote store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the remote store with tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Rejected`] for a duplicate task identifier.
    pub fn seed_tasks(&self, tasks: impl IntoIterator<Item = Task>) -> GatewayResult<()> {
        self.inner.seed_tasks(tasks)
    }

    /// Makes the next status update fail with a rejection.
    pub fn reject_next_status_update(&self) {
        self.reject_next_status.store(true, Ordering::SeqCst);
    }
}

impl Default for FlakyGateway {
    fn default() -> Self {
        Self {
            inner: InMemoryGateway::new(),
            reject_next_status: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RemoteGateway for FlakyGateway {
    async fn fetch_board_tasks(&self, board_id: BoardId) -> GatewayResult<Vec<Task>> {
        self.inner.fetch_board_tasks(board_id).await
    }

    async fn update_task_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<()> {
        if self.reject_next_status.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Rejected("injected rejection".to_owned()));
        }
        self.inner.update_task_status(task_id, status).await
    }

    async fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> GatewayResult<Task> {
        self.inner.update_task(task_id, patch).await
    }

    async fn create_task(&self, request: CreateTaskRequest) -> GatewayResult<Task> {
        self.inner.create_task(request).await
    }
}

/// Reconciler type used by the BDD world.
pub type TestReconciler = Reconciler<FlakyGateway, InMemorySnapshotCache>;

/// Scenario world for board move behaviour tests.
pub struct BoardMoveWorld {
    pub gateway: Arc<FlakyGateway>,
    pub cache: Arc<InMemorySnapshotCache>,
    pub reconciler: Option<TestReconciler>,
    pub last_move: Option<Result<bool, ReconcileError>>,
}

impl BoardMoveWorld {
    /// Creates a world with an empty remote store and cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gateway: Arc::new(FlakyGateway::new()),
            cache: Arc::new(InMemorySnapshotCache::new()),
            reconciler: None,
            last_move: None,
        }
    }
}

impl Default for BoardMoveWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardMoveWorld {
    BoardMoveWorld::default()
}

/// Builds a backlog task for seeding the remote store.
///
/// # Errors
///
/// Returns an error when the title fails domain validation.
pub fn backlog_task(id: u64, title: &str) -> Result<Task, eyre::Report> {
    Ok(Task::from_remote(TaskData {
        id: TaskId::new(id),
        board_id: BOARD,
        title: TaskTitle::new(title)?,
        description: TaskDescription::new("")?,
        priority: TaskPriority::Medium,
        status: TaskStatus::Backlog,
        assignee: Assignee::new(UserId::new(5), "Kim Example"),
    }))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
