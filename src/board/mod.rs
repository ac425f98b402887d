//! Board reconciliation for Tessera.
//!
//! This module keeps a locally held, column-partitioned view of a board's
//! tasks consistent across user-driven reordering, drag-style status
//! transitions, asynchronous confirmation or rejection from the remote task
//! store, and a persisted snapshot cache. The module follows hexagonal
//! architecture:
//!
//! - Domain types and the board state in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The reconciler service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
