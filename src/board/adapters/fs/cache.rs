//! Snapshot cache persisting board state as JSON files.
//!
//! Entries live in a capability-scoped directory, one `board-{id}.json`
//! file per board. Each file wraps the board state in a versioned envelope
//! carrying a save timestamp and a SHA-256 digest of the serialized state;
//! an entry whose version or digest does not match loads as absent, so a
//! stale or damaged cache degrades to a network fetch instead of producing
//! a wrong board.

use crate::board::domain::{BoardId, BoardState};
use crate::board::ports::{CacheError, CacheResult, SnapshotCache};
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::warn;

/// Envelope schema version; bump when the serialized layout changes.
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    digest: String,
    board_id: BoardId,
    state: BoardState,
}

/// Snapshot cache writing one JSON file per board into a directory.
pub struct FsSnapshotCache<C> {
    dir: Dir,
    clock: Arc<C>,
}

impl<C> FsSnapshotCache<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a cache over an already-opened directory.
    #[must_use]
    pub const fn new(dir: Dir, clock: Arc<C>) -> Self {
        Self { dir, clock }
    }

    fn entry_name(board_id: BoardId) -> String {
        format!("board-{board_id}.json")
    }
}

fn digest_hex(payload: &str) -> String {
    Sha256::digest(payload.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

fn state_payload(state: &BoardState) -> CacheResult<String> {
    Ok(serde_json::to_string(state)?)
}

impl<C> SnapshotCache for FsSnapshotCache<C>
where
    C: Clock + Send + Sync,
{
    fn load(&self, board_id: BoardId) -> CacheResult<Option<BoardState>> {
        let name = Self::entry_name(board_id);
        let raw = match self.dir.read_to_string(&name) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(CacheError::storage(err)),
        };
        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(board = %board_id, error = %err, "discarding unreadable cache entry");
                return Ok(None);
            }
        };
        if envelope.schema_version != SCHEMA_VERSION {
            warn!(
                board = %board_id,
                version = envelope.schema_version,
                "discarding cache entry with unsupported schema version"
            );
            return Ok(None);
        }
        let payload = state_payload(&envelope.state)?;
        if digest_hex(&payload) != envelope.digest {
            warn!(board = %board_id, "discarding cache entry with mismatched digest");
            return Ok(None);
        }
        Ok(Some(envelope.state))
    }

    fn save(&self, board_id: BoardId, state: &BoardState) -> CacheResult<()> {
        let payload = state_payload(state)?;
        let envelope = CacheEnvelope {
            schema_version: SCHEMA_VERSION,
            saved_at: self.clock.utc(),
            digest: digest_hex(&payload),
            board_id,
            state: state.clone(),
        };
        let raw = serde_json::to_string(&envelope)?;
        self.dir
            .write(Self::entry_name(board_id), raw.as_bytes())
            .map_err(CacheError::storage)
    }

    fn invalidate(&self, board_id: BoardId) -> CacheResult<()> {
        match self.dir.remove_file(Self::entry_name(board_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::storage(err)),
        }
    }
}
