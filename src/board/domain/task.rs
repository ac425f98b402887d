//! Task aggregate and the mutation payloads exchanged with the remote store.

use super::{
    BoardId, ParseTaskPriorityError, ParseTaskStatusError, TaskDescription, TaskId, TaskTitle,
    UserId,
};
use serde::{Deserialize, Serialize};

/// Column a task currently occupies on the board.
///
/// Variant names match the remote store's wire spelling exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task has not been started.
    Backlog,
    /// Task is being worked on.
    InProgress,
    /// Task is finished.
    Done,
}

impl TaskStatus {
    /// Every status, in board column order.
    pub const ALL: [Self; 3] = [Self::Backlog, Self::InProgress, Self::Done];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "inprogress" | "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal scheduling.
    Medium,
    /// Needs attention first.
    High,
}

impl TaskPriority {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Reference to the user a task is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    /// Assignee user identifier.
    pub id: UserId,
    /// Display name shown on task cards.
    pub full_name: String,
}

impl Assignee {
    /// Creates an assignee reference.
    #[must_use]
    pub fn new(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }
}

/// Task aggregate held in the board state.
///
/// Fields are private; the `status` field is mutated only by
/// [`super::BoardState`] so that column membership and the status value
/// change in the same operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    board_id: BoardId,
    title: TaskTitle,
    description: TaskDescription,
    priority: TaskPriority,
    status: TaskStatus,
    assignee: Assignee,
}

/// Parameter object for assembling a task from remote-store fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    /// Server-assigned task identifier.
    pub id: TaskId,
    /// Owning board.
    pub board_id: BoardId,
    /// Task title.
    pub title: TaskTitle,
    /// Task description.
    pub description: TaskDescription,
    /// Task priority.
    pub priority: TaskPriority,
    /// Server-held status.
    pub status: TaskStatus,
    /// Assigned user.
    pub assignee: Assignee,
}

impl Task {
    /// Assembles a task from remote-store fields.
    #[must_use]
    pub fn from_remote(data: TaskData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            assignee: data.assignee,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning board identifier.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn assignee(&self) -> &Assignee {
        &self.assignee
    }

    /// Applies the non-status fields of a patch in place.
    ///
    /// Status changes are deliberately excluded: the board state applies
    /// them together with the column move so the two never diverge.
    pub fn apply_fields(&mut self, patch: &TaskPatch) {
        if let Some(title) = patch.title() {
            self.title = title.clone();
        }
        if let Some(description) = patch.description() {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority() {
            self.priority = priority;
        }
        if let Some(assignee) = patch.assignee() {
            self.assignee = assignee.clone();
        }
    }

    /// Sets the task status.
    ///
    /// Crate-private: only the board state may call this, as part of the
    /// column move that keeps membership and status in step.
    pub(crate) const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }
}

/// Partial update for an existing task.
///
/// Unset fields are left untouched by the store and skipped on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<TaskTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<TaskDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<Assignee>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: TaskDescription) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a new status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets a new assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Returns the patched title, if any.
    #[must_use]
    pub const fn title(&self) -> Option<&TaskTitle> {
        self.title.as_ref()
    }

    /// Returns the patched description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the patched priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the patched status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the patched assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assignee.is_none()
    }
}

/// Request payload for creating a task on the remote store.
///
/// The server assigns the identifier and, when no status is given, the
/// initial `Backlog` status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    board_id: BoardId,
    title: TaskTitle,
    description: TaskDescription,
    priority: TaskPriority,
    assignee: Assignee,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub const fn new(
        board_id: BoardId,
        title: TaskTitle,
        description: TaskDescription,
        priority: TaskPriority,
        assignee: Assignee,
    ) -> Self {
        Self {
            board_id,
            title,
            description,
            priority,
            assignee,
            status: None,
        }
    }

    /// Requests an explicit initial status instead of the server default.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the owning board identifier.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the requested title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the requested description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the requested priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the requested assignee.
    #[must_use]
    pub const fn assignee(&self) -> &Assignee {
        &self.assignee
    }

    /// Returns the requested initial status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }
}
