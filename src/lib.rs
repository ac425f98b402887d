//! Tessera: a task-board client core.
//!
//! This crate implements the board reconciliation engine for a
//! column-partitioned (Kanban) task board: optimistic local mutation of an
//! ordered board view, asynchronous confirmation against a remote task
//! store, repair on rejection, and a persisted snapshot cache for
//! network-free board restoration.
//!
//! # Architecture
//!
//! Tessera follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board and task data structures with no I/O
//! - **Ports**: Abstract trait interfaces for the remote task store and the
//!   snapshot cache
//! - **Adapters**: Concrete implementations of ports (in-memory, filesystem)
//! - **Services**: The reconciler orchestrating optimistic commits and
//!   settlement
//!
//! Rendering, routing, and form collaborators are out of scope; they drive
//! the reconciler through its operation set and observe board snapshots.

pub mod board;
