//! Shared builders and scripted doubles for board unit tests.

use crate::board::domain::{
    Assignee, BoardId, CreateTaskRequest, Task, TaskData, TaskDescription, TaskId, TaskPatch,
    TaskPriority, TaskStatus, TaskTitle, UserId,
};
use crate::board::ports::{GatewayError, GatewayResult, RemoteGateway};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

/// Board used by all unit tests.
pub const BOARD: BoardId = BoardId::new(1);

/// Builds a task on [`BOARD`] with a default assignee and priority.
pub fn task(id: u64, title: &str, status: TaskStatus) -> Task {
    Task::from_remote(TaskData {
        id: TaskId::new(id),
        board_id: BOARD,
        title: TaskTitle::new(title).expect("valid test title"),
        description: TaskDescription::new("").expect("valid test description"),
        priority: TaskPriority::Medium,
        status,
        assignee: Assignee::new(UserId::new(7), "Alex Example"),
    })
}

/// A scripted reply for a status update call: either settles immediately or
/// waits on a one-shot gate so tests can force settlement order.
pub enum StatusReply {
    /// Settles as soon as the call is made.
    Now(GatewayResult<()>),
    /// Settles when the paired sender fires.
    Gated(oneshot::Receiver<GatewayResult<()>>),
}

/// Gateway double whose replies are scripted per call, in order.
///
/// An unscripted call settles as a transport error, so a test that
/// expects no network traffic can assert on the call counters instead of
/// silently succeeding.
#[derive(Default)]
pub struct ScriptedGateway {
    fetch_replies: Mutex<VecDeque<GatewayResult<Vec<Task>>>>,
    status_replies: Mutex<VecDeque<StatusReply>>,
    update_replies: Mutex<VecDeque<GatewayResult<Task>>>,
    create_replies: Mutex<VecDeque<GatewayResult<Task>>>,
    fetch_calls: AtomicUsize,
    status_calls: AtomicUsize,
    update_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

fn unscripted(call: &str) -> GatewayError {
    GatewayError::transport(std::io::Error::other(format!("unscripted call: {call}")))
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fetch(&self, reply: GatewayResult<Vec<Task>>) {
        self.fetch_replies
            .lock()
            .expect("fetch replies lock")
            .push_back(reply);
    }

    pub fn push_status(&self, reply: GatewayResult<()>) {
        self.status_replies
            .lock()
            .expect("status replies lock")
            .push_back(StatusReply::Now(reply));
    }

    /// Scripts a status reply that settles only when the returned sender
    /// fires, letting the test interleave other gestures first.
    pub fn push_gated_status(&self) -> oneshot::Sender<GatewayResult<()>> {
        let (sender, receiver) = oneshot::channel();
        self.status_replies
            .lock()
            .expect("status replies lock")
            .push_back(StatusReply::Gated(receiver));
        sender
    }

    pub fn push_update(&self, reply: GatewayResult<Task>) {
        self.update_replies
            .lock()
            .expect("update replies lock")
            .push_back(reply);
    }

    pub fn push_create(&self, reply: GatewayResult<Task>) {
        self.create_replies
            .lock()
            .expect("create replies lock")
            .push_back(reply);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Waits until the given number of status calls has been made,
    /// yielding so the observed call can reach its suspension point.
    pub async fn wait_for_status_calls(&self, count: usize) {
        while self.status_calls() < count {
            tokio::task::yield_now().await;
        }
        tokio::task::yield_now().await;
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn fetch_board_tasks(&self, _board_id: BoardId) -> GatewayResult<Vec<Task>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_replies
            .lock()
            .expect("fetch replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("fetch_board_tasks")))
    }

    async fn update_task_status(&self, _task_id: TaskId, _status: TaskStatus) -> GatewayResult<()> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .status_replies
            .lock()
            .expect("status replies lock")
            .pop_front();
        match reply {
            Some(StatusReply::Now(settled)) => settled,
            Some(StatusReply::Gated(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(unscripted("gated status reply dropped"))),
            None => Err(unscripted("update_task_status")),
        }
    }

    async fn update_task(&self, _task_id: TaskId, _patch: TaskPatch) -> GatewayResult<Task> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.update_replies
            .lock()
            .expect("update replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("update_task")))
    }

    async fn create_task(&self, _request: CreateTaskRequest) -> GatewayResult<Task> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.create_replies
            .lock()
            .expect("create replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("create_task")))
    }
}
