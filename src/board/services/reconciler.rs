//! Optimistic board mutation with asynchronous settlement.
//!
//! The reconciler owns one board state and makes every user-visible
//! mutation feel instantaneous: the store is mutated synchronously before
//! the matching remote call is issued, and settlement either leaves the
//! optimistic arrangement as authoritative or repairs the store from the
//! pre-mutation snapshot. Completions can arrive out of order; a per-task
//! attempt sequence number ensures that at most one outstanding mutation
//! result is allowed to touch the store for a given task, with stale
//! settlements discarded outright. Every committed mutation is written
//! through to the snapshot cache so the arrangement survives a reload.

use crate::board::domain::{
    BoardId, BoardState, CreateTaskRequest, Task, TaskId, TaskPatch, TaskStatus,
};
use crate::board::ports::{GatewayError, RemoteGateway, SnapshotCache};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Result type for reconciler operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Tuning knobs for the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Watchdog deadline for every remote call. A request that has not
    /// settled by then is treated as failed; there is no cancellation
    /// channel to the gateway, so the request itself is merely abandoned.
    pub request_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// How the reconciler recovered the store after a failed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The affected task was restored to its pre-mutation position; the
    /// rest of the board, including unrelated optimistic moves, was kept.
    RolledBack,
    /// Single-task repair was ambiguous; the whole board was refetched
    /// from the remote store.
    Resynced,
}

impl std::fmt::Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RolledBack => write!(f, "rolled back"),
            Self::Resynced => write!(f, "resynced"),
        }
    }
}

/// Errors surfaced by reconciler operations.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// The board could not be fetched; fatal to the mount or reset that
    /// needed it, and no partial board is produced.
    #[error("board fetch failed: {0}")]
    FetchFailed(#[source] GatewayError),

    /// A status transition was not accepted by the remote store. The
    /// store has already been recovered; the error is a dismissable
    /// notice, and a manual reset is the retry path.
    #[error("status update for task {task_id} failed ({recovery}): {source}")]
    StatusUpdateFailed {
        /// Task whose transition failed.
        task_id: TaskId,
        /// Recovery applied to the store.
        recovery: Recovery,
        /// Gateway failure that settled the attempt.
        source: GatewayError,
    },

    /// A field edit was not accepted by the remote store. The pre-edit
    /// task has been reinstated.
    #[error("edit of task {task_id} failed ({recovery}): {source}")]
    EditFailed {
        /// Task whose edit failed.
        task_id: TaskId,
        /// Recovery applied to the store.
        recovery: Recovery,
        /// Gateway failure that settled the attempt.
        source: GatewayError,
    },

    /// Task creation failed on the remote store; the board was not
    /// touched.
    #[error("task creation failed: {0}")]
    CreateFailed(#[source] GatewayError),

    /// The named task is not on the board.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),

    /// The board state lock was poisoned by a panicking thread.
    #[error("board state lock poisoned")]
    StatePoisoned,
}

#[derive(Debug, Default)]
struct ReconcilerState {
    board: BoardState,
    /// Latest attempt sequence number per task with a settlement still
    /// outstanding.
    attempts: HashMap<TaskId, u64>,
    next_attempt: u64,
}

impl ReconcilerState {
    fn begin_attempt(&mut self, task_id: TaskId) -> u64 {
        self.next_attempt += 1;
        self.attempts.insert(task_id, self.next_attempt);
        self.next_attempt
    }

    /// Claims the settlement slot for an attempt. Returns `true` and
    /// clears the entry when the attempt is still the task's latest;
    /// returns `false` for a superseded attempt, whose settlement must be
    /// ignored entirely.
    fn take_if_latest(&mut self, task_id: TaskId, attempt: u64) -> bool {
        if self.attempts.get(&task_id) == Some(&attempt) {
            self.attempts.remove(&task_id);
            return true;
        }
        false
    }
}

/// Reconciler for a single board.
///
/// Rendering collaborators call the operation set and observe board
/// snapshots; they never mutate the underlying sequences directly. All
/// store mutations run synchronously to completion while a lock is held,
/// and the lock is never held across an await, so gestures may be
/// processed while remote calls are outstanding.
pub struct Reconciler<G, S> {
    gateway: Arc<G>,
    cache: Arc<S>,
    board_id: BoardId,
    config: ReconcilerConfig,
    state: RwLock<ReconcilerState>,
}

impl<G, S> Reconciler<G, S>
where
    G: RemoteGateway,
    S: SnapshotCache,
{
    /// Creates a reconciler with the default configuration.
    #[must_use]
    pub fn new(board_id: BoardId, gateway: Arc<G>, cache: Arc<S>) -> Self {
        Self::with_config(board_id, gateway, cache, ReconcilerConfig::default())
    }

    /// Creates a reconciler with an explicit configuration.
    #[must_use]
    pub fn with_config(
        board_id: BoardId,
        gateway: Arc<G>,
        cache: Arc<S>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            gateway,
            cache,
            board_id,
            config,
            state: RwLock::new(ReconcilerState::default()),
        }
    }

    /// Returns the board this reconciler manages.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    fn read_state(&self) -> ReconcileResult<RwLockReadGuard<'_, ReconcilerState>> {
        self.state.read().map_err(|_| ReconcileError::StatePoisoned)
    }

    fn write_state(&self) -> ReconcileResult<RwLockWriteGuard<'_, ReconcilerState>> {
        self.state
            .write()
            .map_err(|_| ReconcileError::StatePoisoned)
    }

    /// Best-effort cache write-through. The cache is an availability
    /// optimization, not a store of record, so a failed save is logged
    /// and the user-visible operation proceeds.
    fn persist(&self, board: &BoardState) {
        if let Err(err) = self.cache.save(self.board_id, board) {
            warn!(board = %self.board_id, error = %err, "snapshot cache write failed");
        }
    }

    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match tokio::time::timeout(self.config.request_timeout, call).await {
            Ok(settled) => settled,
            Err(_elapsed) => Err(GatewayError::TimedOut),
        }
    }

    /// Returns a point-in-time copy of the board for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn snapshot(&self) -> ReconcileResult<BoardState> {
        Ok(self.read_state()?.board.snapshot())
    }

    /// Returns the number of tasks with a settlement still outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn pending_mutations(&self) -> ReconcileResult<usize> {
        Ok(self.read_state()?.attempts.len())
    }

    /// Hydrates the board: from the snapshot cache when an entry exists
    /// (skipping the network entirely), otherwise from the remote store.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::FetchFailed`] when no usable cache entry
    /// exists and the fetch fails; no partial board is produced.
    pub async fn mount(&self) -> ReconcileResult<BoardState> {
        match self.cache.load(self.board_id) {
            Ok(Some(cached)) => {
                debug!(board = %self.board_id, tasks = cached.len(), "hydrating board from cache");
                let mut state = self.write_state()?;
                state.board.restore(cached.snapshot());
                return Ok(cached);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(board = %self.board_id, error = %err, "cache load failed, falling back to fetch");
            }
        }
        self.refetch().await
    }

    /// Discards all local state: invalidates the cache entry and rebuilds
    /// the board from an unconditional fetch.
    ///
    /// Attempt bookkeeping deliberately survives a reset so a pre-reset
    /// in-flight settlement still resolves; a failure whose task vanished
    /// repairs via resync, which converges on the server state.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::FetchFailed`] when the fetch fails.
    pub async fn reset(&self) -> ReconcileResult<BoardState> {
        if let Err(err) = self.cache.invalidate(self.board_id) {
            warn!(board = %self.board_id, error = %err, "cache invalidation failed");
        }
        self.refetch().await
    }

    async fn refetch(&self) -> ReconcileResult<BoardState> {
        let tasks = self
            .with_deadline(self.gateway.fetch_board_tasks(self.board_id))
            .await
            .map_err(ReconcileError::FetchFailed)?;
        let board = BoardState::from_tasks(tasks);
        {
            let mut state = self.write_state()?;
            state.board.restore(board.snapshot());
        }
        self.persist(&board);
        Ok(board)
    }

    /// Reorders a task within a column.
    ///
    /// A local-display concern: the store is mutated and the cache updated
    /// so the manual order survives a reload, but no remote call is made.
    /// Out-of-range indices are absorbed as a no-op. Returns whether the
    /// board changed.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn move_within_column(
        &self,
        status: TaskStatus,
        from: usize,
        to: usize,
    ) -> ReconcileResult<bool> {
        let after = {
            let mut state = self.write_state()?;
            if !state.board.move_within_column(status, from, to) {
                return Ok(false);
            }
            state.board.snapshot()
        };
        self.persist(&after);
        Ok(true)
    }

    /// Moves a task to another column: optimistic status transition with
    /// asynchronous confirmation.
    ///
    /// The store is mutated immediately and the transition sent to the
    /// remote store under the watchdog deadline. On success the optimistic
    /// arrangement becomes authoritative. On failure the affected task is
    /// restored from the pre-move snapshot (other tasks' concurrent
    /// optimistic moves are kept) or, when that repair is ambiguous, the
    /// whole board is refetched. A settlement arriving after a newer
    /// attempt for the same task is discarded without touching the store.
    /// Returns whether the gesture changed the board; out-of-range source
    /// indices are absorbed without issuing a remote call.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::StatusUpdateFailed`] when the remote
    /// store rejects the transition (the store has been recovered), or
    /// [`ReconcileError::StatePoisoned`] when the state lock is poisoned.
    pub async fn move_between_columns(
        &self,
        source: TaskStatus,
        dest: TaskStatus,
        from: usize,
        to: usize,
    ) -> ReconcileResult<bool> {
        if source == dest {
            return self.move_within_column(source, from, to);
        }
        let (task_id, attempt, snapshot_before) = {
            let mut state = self.write_state()?;
            let snapshot_before = state.board.snapshot();
            let Some(task_id) = state.board.move_between_columns(source, dest, from, to) else {
                return Ok(false);
            };
            let attempt = state.begin_attempt(task_id);
            let after = state.board.snapshot();
            drop(state);
            self.persist(&after);
            debug!(task = %task_id, %dest, attempt, "optimistic status transition committed");
            (task_id, attempt, snapshot_before)
        };

        match self
            .with_deadline(self.gateway.update_task_status(task_id, dest))
            .await
        {
            Ok(()) => {
                let mut state = self.write_state()?;
                if state.take_if_latest(task_id, attempt) {
                    debug!(task = %task_id, attempt, "status transition confirmed");
                } else {
                    warn!(task = %task_id, attempt, "discarding stale status confirmation");
                }
                Ok(true)
            }
            Err(source_err) => match self.settle_failure(task_id, attempt, &snapshot_before).await?
            {
                Some(recovery) => Err(ReconcileError::StatusUpdateFailed {
                    task_id,
                    recovery,
                    source: source_err,
                }),
                None => Ok(true),
            },
        }
    }

    /// Edits a task's fields: optimistic patch with asynchronous
    /// confirmation.
    ///
    /// The patch is applied to the store immediately (a status change in
    /// the patch moves the task to the end of the destination column) and
    /// sent to the remote store. On success the server's canonical task is
    /// merged back as the authoritative value. On failure only the
    /// pre-edit task is reinstated, not the whole board. Stale settlements
    /// are discarded per the attempt rule.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::UnknownTask`] when the task is not on the
    /// board, [`ReconcileError::EditFailed`] when the remote store rejects
    /// the edit, or [`ReconcileError::StatePoisoned`] on lock poisoning.
    pub async fn edit(&self, task_id: TaskId, patch: TaskPatch) -> ReconcileResult<Task> {
        let (attempt, snapshot_before) = {
            let mut state = self.write_state()?;
            let snapshot_before = state.board.snapshot();
            if !state.board.apply_patch(task_id, &patch) {
                return Err(ReconcileError::UnknownTask(task_id));
            }
            let attempt = state.begin_attempt(task_id);
            let after = state.board.snapshot();
            drop(state);
            self.persist(&after);
            debug!(task = %task_id, attempt, "optimistic edit committed");
            (attempt, snapshot_before)
        };

        match self
            .with_deadline(self.gateway.update_task(task_id, patch))
            .await
        {
            Ok(canonical) => {
                let merged = {
                    let mut state = self.write_state()?;
                    if !state.take_if_latest(task_id, attempt) {
                        warn!(task = %task_id, attempt, "discarding stale edit confirmation");
                        return Ok(canonical);
                    }
                    state.board.merge_canonical(&canonical);
                    state.board.snapshot()
                };
                self.persist(&merged);
                Ok(canonical)
            }
            Err(source_err) => match self.settle_failure(task_id, attempt, &snapshot_before).await?
            {
                Some(recovery) => Err(ReconcileError::EditFailed {
                    task_id,
                    recovery,
                    source: source_err,
                }),
                // Superseded attempt: the failure is ignored and the task
                // as currently held is reported back.
                None => {
                    let state = self.read_state()?;
                    state
                        .board
                        .find_task(task_id)
                        .cloned()
                        .ok_or(ReconcileError::UnknownTask(task_id))
                }
            },
        }
    }

    /// Creates a task on the remote store and appends it to the board.
    ///
    /// Not optimistic: no client-assigned identifier would be valid, so
    /// the store is only touched once the server returns the created task,
    /// which lands at the end of the column matching its server-assigned
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::CreateFailed`] when the remote store
    /// rejects the creation (the board is left untouched), or
    /// [`ReconcileError::StatePoisoned`] on lock poisoning.
    pub async fn create(&self, request: CreateTaskRequest) -> ReconcileResult<Task> {
        let created = self
            .with_deadline(self.gateway.create_task(request))
            .await
            .map_err(ReconcileError::CreateFailed)?;
        let after = {
            let mut state = self.write_state()?;
            state.board.push_task(created.clone());
            state.board.snapshot()
        };
        self.persist(&after);
        debug!(task = %created.id(), "created task appended to board");
        Ok(created)
    }

    /// Settles a failed mutation attempt.
    ///
    /// Returns `Ok(None)` when the attempt was superseded (the failure is
    /// ignored), `Ok(Some(recovery))` otherwise. Repair prefers restoring
    /// the affected task from the pre-mutation snapshot; when that is
    /// ambiguous the board is refetched wholesale.
    async fn settle_failure(
        &self,
        task_id: TaskId,
        attempt: u64,
        snapshot_before: &BoardState,
    ) -> ReconcileResult<Option<Recovery>> {
        let recovery = {
            let mut state = self.write_state()?;
            if !state.take_if_latest(task_id, attempt) {
                warn!(task = %task_id, attempt, "discarding stale failure for superseded attempt");
                return Ok(None);
            }
            if state.board.restore_task_from(snapshot_before, task_id) {
                let repaired = state.board.snapshot();
                drop(state);
                self.persist(&repaired);
                Recovery::RolledBack
            } else {
                Recovery::Resynced
            }
        };
        if recovery == Recovery::Resynced {
            warn!(task = %task_id, "single-task repair ambiguous, resyncing board");
            if let Err(err) = self.refetch().await {
                warn!(board = %self.board_id, error = %err, "board resync after failed mutation did not complete");
            }
        }
        Ok(Some(recovery))
    }
}
