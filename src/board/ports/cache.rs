//! Snapshot cache port for persisted board state.

use crate::board::domain::{BoardId, BoardState};
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Keyed snapshot storage for board state, one entry per board.
///
/// Semantics are last-write-wins on the board key with no transactional
/// guarantee. Entries that cannot be trusted (corrupt payload, schema
/// version mismatch) load as absent rather than as errors, so a damaged
/// cache degrades to a network fetch.
pub trait SnapshotCache: Send + Sync {
    /// Returns the stored snapshot for the board, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing storage itself fails.
    fn load(&self, board_id: BoardId) -> CacheResult<Option<BoardState>>;

    /// Overwrites the stored snapshot for the board.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the snapshot cannot be serialized or
    /// written.
    fn save(&self, board_id: BoardId, state: &BoardState) -> CacheResult<()>;

    /// Removes the stored snapshot for the board, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backing storage itself fails.
    fn invalidate(&self, board_id: BoardId) -> CacheResult<()>;
}

/// Errors returned by snapshot cache implementations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Backing storage failure.
    #[error("cache storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),

    /// The snapshot could not be serialized.
    #[error("cache serialization error: {0}")]
    Serialization(Arc<serde_json::Error>),
}

impl CacheError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}
