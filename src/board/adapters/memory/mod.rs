//! In-memory adapters for tests, demos, and offline use.

mod cache;
mod gateway;

pub use cache::InMemorySnapshotCache;
pub use gateway::InMemoryGateway;
