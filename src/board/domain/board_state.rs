//! Column-partitioned ordered board state (the task store).
//!
//! Pure data structure with validated mutation operations and no awareness
//! of network state. Out-of-range indices coming from stray gestures are
//! absorbed as no-ops rather than raised, so a bad drag can never corrupt
//! the board. Two invariants hold for every reachable value:
//!
//! - a task's `status` field always equals the column holding it; both are
//!   updated inside a single operation
//! - every task identifier appears in exactly one column, never zero,
//!   never more than one

use super::{Task, TaskId, TaskPatch, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered partition of a board's tasks into status columns.
///
/// Order within a column is display order chosen by the user; it is not
/// significant to the remote store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    backlog: Vec<Task>,
    in_progress: Vec<Task>,
    done: Vec<Task>,
}

impl BoardState {
    /// Creates an empty board state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions a fetched task list into columns, preserving the server's
    /// order within each column.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::new();
        for task in tasks {
            board.push_task(task);
        }
        board
    }

    /// Returns the ordered tasks in the named column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Backlog => &self.backlog,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Backlog => &mut self.backlog,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backlog.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when no column holds any task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every task identifier on the board, column by column.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        TaskStatus::ALL
            .into_iter()
            .flat_map(|status| self.column(status).iter().map(Task::id))
    }

    /// Finds a task by identifier in whichever column holds it.
    #[must_use]
    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.locate(id)
            .and_then(|(status, index)| self.column(status).get(index))
    }

    /// Returns the column and index currently holding the task.
    #[must_use]
    pub fn locate(&self, id: TaskId) -> Option<(TaskStatus, usize)> {
        TaskStatus::ALL.into_iter().find_map(|status| {
            self.column(status)
                .iter()
                .position(|task| task.id() == id)
                .map(|index| (status, index))
        })
    }

    /// Reorders a task within a single column.
    ///
    /// Removes the task at `from` and reinserts it at `to` (clamped to the
    /// shortened column). Returns `false` without touching the board when
    /// `from` is past the end or `to` is beyond the column length; a stray
    /// gesture must never corrupt the board. No status change occurs.
    pub fn move_within_column(&mut self, status: TaskStatus, from: usize, to: usize) -> bool {
        let column = self.column_mut(status);
        if from >= column.len() || to > column.len() {
            return false;
        }
        let moved = column.remove(from);
        let insert_at = to.min(column.len());
        column.insert(insert_at, moved);
        true
    }

    /// Moves a task from one column to another.
    ///
    /// With equal statuses this delegates to [`Self::move_within_column`].
    /// Otherwise the task at `from` leaves the source column, its status
    /// becomes `dest`, and it lands at `min(to, destination length)`: the
    /// destination index is clamped, not rejected, because the destination
    /// may have changed since the gesture started. An out-of-range `from`
    /// is a no-op. Returns the moved task's identifier when the board
    /// changed.
    pub fn move_between_columns(
        &mut self,
        source: TaskStatus,
        dest: TaskStatus,
        from: usize,
        to: usize,
    ) -> Option<TaskId> {
        if source == dest {
            let id = self.column(source).get(from).map(Task::id)?;
            return self.move_within_column(source, from, to).then_some(id);
        }
        let source_column = self.column_mut(source);
        if from >= source_column.len() {
            return None;
        }
        let mut moved = source_column.remove(from);
        moved.set_status(dest);
        let id = moved.id();
        let dest_column = self.column_mut(dest);
        let insert_at = to.min(dest_column.len());
        dest_column.insert(insert_at, moved);
        Some(id)
    }

    /// Applies a patch to the task with the given identifier.
    ///
    /// Non-status fields change in place. A status change is a move to the
    /// end of the destination column, applied atomically with the field
    /// update. Returns `false` when the task is unknown.
    pub fn apply_patch(&mut self, id: TaskId, patch: &TaskPatch) -> bool {
        let Some((current_status, index)) = self.locate(id) else {
            return false;
        };
        let Some(task) = self.column_mut(current_status).get_mut(index) else {
            return false;
        };
        task.apply_fields(patch);
        if let Some(new_status) = patch.status()
            && new_status != current_status
        {
            let mut moved = self.column_mut(current_status).remove(index);
            moved.set_status(new_status);
            self.column_mut(new_status).push(moved);
        }
        true
    }

    /// Overwrites a task with the remote store's canonical copy.
    ///
    /// Position is kept when the canonical status matches the current
    /// column; otherwise the task moves to the end of the canonical column.
    /// Returns `false` when the task is unknown.
    pub fn merge_canonical(&mut self, canonical: &Task) -> bool {
        let Some((current_status, index)) = self.locate(canonical.id()) else {
            return false;
        };
        if current_status == canonical.status() {
            if let Some(task) = self.column_mut(current_status).get_mut(index) {
                *task = canonical.clone();
            }
        } else {
            self.column_mut(current_status).remove(index);
            self.column_mut(canonical.status()).push(canonical.clone());
        }
        true
    }

    /// Appends a task to the column matching its status.
    ///
    /// Returns `false` without changes when the identifier is already on
    /// the board, preserving the one-column-per-task invariant.
    pub fn push_task(&mut self, task: Task) -> bool {
        if self.locate(task.id()).is_some() {
            return false;
        }
        self.column_mut(task.status()).push(task);
        true
    }

    /// Removes and returns a task from whichever column holds it.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let (status, index) = self.locate(id)?;
        Some(self.column_mut(status).remove(index))
    }

    /// Returns a point-in-time copy for rollback or caching.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Replaces the whole board with a snapshot.
    pub fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }

    /// Reinstates a single task from a snapshot, leaving the rest of the
    /// board untouched.
    ///
    /// The snapshot's copy replaces the current one at the snapshot's
    /// column and index (clamped). Returns `false` when the repair is
    /// ambiguous (the task is absent from the snapshot or from the
    /// current board), in which case the caller should resync instead.
    pub fn restore_task_from(&mut self, snapshot: &Self, id: TaskId) -> bool {
        let Some((prior_status, prior_index)) = snapshot.locate(id) else {
            return false;
        };
        let Some(prior) = snapshot.column(prior_status).get(prior_index) else {
            return false;
        };
        let Some((current_status, current_index)) = self.locate(id) else {
            return false;
        };
        self.column_mut(current_status).remove(current_index);
        let column = self.column_mut(prior_status);
        let insert_at = prior_index.min(column.len());
        column.insert(insert_at, prior.clone());
        true
    }

    /// Checks both board invariants: unique identifiers and status/column
    /// agreement.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        for status in TaskStatus::ALL {
            for task in self.column(status) {
                if task.status() != status || !seen.insert(task.id()) {
                    return false;
                }
            }
        }
        true
    }
}
