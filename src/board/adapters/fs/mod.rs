//! Filesystem-backed snapshot cache.

mod cache;

pub use cache::FsSnapshotCache;
