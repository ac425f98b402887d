//! Port contracts for board reconciliation.
//!
//! Ports define infrastructure-agnostic interfaces consumed by the
//! reconciler: the remote task store and the persisted snapshot cache.

pub mod cache;
pub mod gateway;

pub use cache::{CacheError, CacheResult, SnapshotCache};
pub use gateway::{GatewayError, GatewayResult, RemoteGateway};
