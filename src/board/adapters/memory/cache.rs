//! In-memory snapshot cache.

use crate::board::domain::{BoardId, BoardState};
use crate::board::ports::{CacheError, CacheResult, SnapshotCache};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory snapshot cache keyed by board identifier.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotCache {
    entries: Arc<RwLock<HashMap<BoardId, BoardState>>>,
}

impl InMemorySnapshotCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotCache for InMemorySnapshotCache {
    fn load(&self, board_id: BoardId) -> CacheResult<Option<BoardState>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| CacheError::storage(std::io::Error::other(err.to_string())))?;
        Ok(entries.get(&board_id).cloned())
    }

    fn save(&self, board_id: BoardId, state: &BoardState) -> CacheResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| CacheError::storage(std::io::Error::other(err.to_string())))?;
        entries.insert(board_id, state.clone());
        Ok(())
    }

    fn invalidate(&self, board_id: BoardId) -> CacheResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| CacheError::storage(std::io::Error::other(err.to_string())))?;
        entries.remove(&board_id);
        Ok(())
    }
}
